//! End-to-end checks of the digitizer on small inline documents.

use glam::{DVec2, dvec2};
use svg_digitize::{Axis, DigitizeError, DigitizeOptions, Mode, digitize, digitize_str};

const OPEN: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:inkscape="http://www.inkscape.org/namespaces/inkscape">"#;

/// Reference axes spanning canvas 0..100 on both axes, mapped to 0..10.
const AXES: &str = r#"
  <path inkscape:label="xref 0 10" d="M 0,0 H 100" />
  <path inkscape:label="yref 0 10" d="M 0,0 V 100" />
"#;

fn document(body: &str) -> String {
    format!("{OPEN}{AXES}{body}</svg>")
}

fn points(result: &svg_digitize::Digitized, label: &str) -> Vec<DVec2> {
    result.series.get(label).unwrap().points().to_vec()
}

fn assert_points_near(actual: &[DVec2], expected: &[DVec2]) {
    assert_eq!(actual.len(), expected.len(), "got {actual:?}, expected {expected:?}");
    for (a, e) in actual.iter().zip(expected) {
        assert!(a.abs_diff_eq(*e, 1e-9), "got {actual:?}, expected {expected:?}");
    }
}

#[test]
fn canvas_midpoint_resolves_to_real_midpoint() {
    let svg = document(r#"<path inkscape:label="A" d="M 50,20" />"#);
    let result = digitize_str(&svg, &DigitizeOptions::new(["A"])).unwrap();
    assert_eq!(points(&result, "A"), [dvec2(5.0, 2.0)]);
    assert_eq!(result.x_axis.axis, Axis::X);
    assert_eq!((result.x_axis.canvas_start, result.x_axis.canvas_end), (0.0, 100.0));
}

#[test]
fn absolute_and_relative_paths_agree() {
    let svg = document(
        r#"<path inkscape:label="abs" d="M0,0 L10,0 L10,10" />
           <path inkscape:label="rel" d="m0,0 l10,0 l0,10" />"#,
    );
    let result = digitize_str(&svg, &DigitizeOptions::new(["abs", "rel"])).unwrap();
    let expected = [dvec2(0.0, 0.0), dvec2(1.0, 0.0), dvec2(1.0, 1.0)];
    assert_eq!(points(&result, "abs"), expected);
    assert_eq!(points(&result, "rel"), expected);
}

#[test]
fn element_transform_nests_inside_group_transform() {
    let svg = document(
        r#"<g transform="scale(2,2)">
             <path inkscape:label="A" transform="translate(1,0)" d="M 0,0" />
           </g>"#,
    );
    let result = digitize_str(&svg, &DigitizeOptions::new(["A"])).unwrap();
    // canvas (2,0) on a 0..100 → 0..10 axis
    assert_points_near(&points(&result, "A"), &[dvec2(0.2, 0.0)]);
}

#[test]
fn missing_x_reference_is_reported() {
    let svg = format!(
        r#"{OPEN}
  <path inkscape:label="yref 0 10" d="M 0,0 V 100" />
  <path inkscape:label="A" d="M 1,1" />
</svg>"#
    );
    let err = digitize_str(&svg, &DigitizeOptions::new(["A"])).unwrap_err();
    assert!(
        matches!(err, DigitizeError::MissingReferenceAxis { axis: Axis::X, .. }),
        "unexpected error: {err:?}"
    );
}

#[test]
fn custom_reference_prefixes() {
    let svg = format!(
        r#"{OPEN}
  <path inkscape:label="time: 0 to 60" d="M 0,0 H 100" />
  <path inkscape:label="temp: 20 to 30" d="M 0,100 V 0" />
  <path inkscape:label="A" d="M 50,50" />
</svg>"#
    );
    let options = DigitizeOptions::new(["A"])
        .with_x_reference("time:")
        .with_y_reference("temp:");
    let result = digitize_str(&svg, &options).unwrap();
    assert_eq!(points(&result, "A"), [dvec2(30.0, 25.0)]);
}

#[test]
fn group_mode_accumulates_groups_sharing_a_label() {
    let svg = document(
        r#"<g inkscape:label="A"><path d="M 10,10 L 30,30" /></g>
           <g inkscape:label="B"><path d="M 0,0" /></g>
           <g inkscape:label="A"><path d="M 10,10 L 10,10" /></g>"#,
    );
    let options = DigitizeOptions::new(["A"]).with_mode(Mode::Group);
    let result = digitize_str(&svg, &options).unwrap();
    assert_points_near(&points(&result, "A"), &[dvec2(1.0, 1.0), dvec2(2.0, 2.0)]);
}

#[test]
fn labels_without_points_stay_empty() {
    let svg = document("");
    let result = digitize_str(&svg, &DigitizeOptions::new(["nothing"])).unwrap();
    assert!(result.series.get("nothing").unwrap().is_empty());
}

#[test]
fn input_given_as_inkscape_lines() {
    let lines = vec![
        r#"<svg"#.to_string(),
        r#"   xmlns="http://www.w3.org/2000/svg""#.to_string(),
        r#"   xmlns:inkscape="http://www.inkscape.org/namespaces/inkscape">"#.to_string(),
        r#"  <g"#.to_string(),
        r#"     inkscape:label="Layer 1""#.to_string(),
        r#"     transform="translate(0,-10)">"#.to_string(),
        r#"    <path"#.to_string(),
        r#"       d="m 0,10 h 100""#.to_string(),
        r#"       inkscape:label="xref 0 1" />"#.to_string(),
        r#"    <path"#.to_string(),
        r#"       d="m 0,110 v -100""#.to_string(),
        r#"       inkscape:label="yref 0 1" />"#.to_string(),
        r#"    <path"#.to_string(),
        r#"       id="path3""#.to_string(),
        r#"       d="M 75,35 25,85""#.to_string(),
        r#"       inkscape:label="A" />"#.to_string(),
        r#"  </g>"#.to_string(),
        r#"</svg>"#.to_string(),
    ];
    let result = digitize(&lines, &DigitizeOptions::new(["A"])).unwrap();
    assert_points_near(&points(&result, "A"), &[dvec2(0.25, 0.25), dvec2(0.75, 0.75)]);
}

#[test]
fn stray_group_close_does_not_stop_the_run() {
    let lines = [
        "<svg>",
        r#"<path label="xref 0 10" d="M 0,0 H 100"/>"#,
        r#"<path label="yref 0 10" d="M 0,0 V 100"/>"#,
        "</g>",
        r#"<path label="A" d="M 50,50"/>"#,
        "</svg>",
    ];
    let result = digitize(lines, &DigitizeOptions::new(["A"])).unwrap();
    assert_eq!(points(&result, "A"), [dvec2(5.0, 5.0)]);
}

#[test]
fn errors_render_as_diagnostics() {
    let svg = format!(
        r#"{OPEN}
  <path inkscape:label="xref 0 10 20" d="M 0,0 H 100" />
</svg>"#
    );
    let err = digitize_str(&svg, &DigitizeOptions::new(["A"])).unwrap_err();
    let report = format!("{:?}", miette::Report::new(err));
    assert!(report.contains("exactly two numbers"), "report was:\n{report}");
}
