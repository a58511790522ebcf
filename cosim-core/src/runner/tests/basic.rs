//! Basic runner tests: full drives, overrides, skip semantics.

use crate::example_components::{echo_model, EchoFactory};
use crate::runner::{RunConfig, RunnerBuilder};
use crate::table::Table;
use crate::validation::Outcome;
use crate::value::Value;

fn input_table() -> Table {
    let mut table = Table::new(vec![
        "u_real".to_string(),
        "u_int".to_string(),
        "u_bool".to_string(),
    ]);
    table
        .push_row(
            0.0,
            vec!["1.5".to_string(), "1".to_string(), "true".to_string()],
        )
        .unwrap();
    table
        .push_row(
            0.5,
            vec!["2.5".to_string(), "2".to_string(), "false".to_string()],
        )
        .unwrap();
    table
        .push_row(
            1.0,
            vec!["3.5".to_string(), "3".to_string(), "true".to_string()],
        )
        .unwrap();
    table
}

fn expected_table() -> Table {
    let mut table = Table::new(vec![
        "y_real".to_string(),
        "y_int".to_string(),
        "y_bool".to_string(),
    ]);
    table
        .push_row(
            0.5,
            vec!["1.5".to_string(), "1".to_string(), "true".to_string()],
        )
        .unwrap();
    table
        .push_row(
            1.0,
            vec!["2.5".to_string(), "2".to_string(), "false".to_string()],
        )
        .unwrap();
    table
        .push_row(
            1.5,
            vec!["3.5".to_string(), "3".to_string(), "true".to_string()],
        )
        .unwrap();
    table
}

#[test]
fn full_drive_validates_every_matched_row() {
    let runner = RunnerBuilder::new()
        .with_model(echo_model())
        .with_factory(Box::new(EchoFactory::default()))
        .with_inputs(input_table())
        .with_expected(expected_table())
        .build()
        .unwrap();

    let report = runner.run_once(0);

    assert!(report.failure.is_none());
    assert_eq!(report.steps_completed, 3);
    // Three matched timestamps, three validated columns each
    assert_eq!(report.records.len(), 9);
    assert!(report.passed());
}

#[test]
fn overrides_are_delivered_typed() {
    // No input column touches u_real, so the validated y_real value can only
    // come from the initial override, delivered as a float.
    let mut inputs = Table::new(vec!["u_int".to_string()]);
    inputs.push_row(0.0, vec!["7".to_string()]).unwrap();

    let mut expected = Table::new(vec!["y_real".to_string(), "label".to_string()]);
    expected
        .push_row(0.5, vec!["10.5".to_string(), "motor A".to_string()])
        .unwrap();

    let runner = RunnerBuilder::new()
        .with_model(echo_model())
        .with_factory(Box::new(EchoFactory::default()))
        .with_inputs(inputs)
        .with_expected(expected)
        .with_overrides(vec![
            ("u_real".to_string(), "10.5".to_string()),
            ("label".to_string(), "motor A".to_string()),
        ])
        .build()
        .unwrap();

    let report = runner.run_once(0);

    assert!(report.passed(), "{}", report);
    let speed = report
        .records
        .iter()
        .find(|r| r.variable == "y_real")
        .unwrap();
    assert_eq!(speed.actual, Value::Real(10.5));
}

#[test]
fn override_with_wrong_causality_is_skipped() {
    // y_real is an output; the override must be ignored, leaving the default
    let mut inputs = Table::new(vec!["u_int".to_string()]);
    inputs.push_row(0.0, vec!["7".to_string()]).unwrap();

    let mut expected = Table::new(vec!["y_real".to_string()]);
    expected.push_row(0.5, vec!["0".to_string()]).unwrap();

    let runner = RunnerBuilder::new()
        .with_model(echo_model())
        .with_factory(Box::new(EchoFactory::default()))
        .with_inputs(inputs)
        .with_expected(expected)
        .with_overrides(vec![("y_real".to_string(), "10.5".to_string())])
        .build()
        .unwrap();

    let report = runner.run_once(0);
    assert!(report.failure.is_none());
    assert!(report.passed());
}

#[test]
fn unknown_input_column_is_skipped() {
    let mut inputs = Table::new(vec!["u_real".to_string(), "ghost".to_string()]);
    inputs
        .push_row(0.0, vec!["1.5".to_string(), "1".to_string()])
        .unwrap();

    let mut expected = Table::new(vec!["y_real".to_string()]);
    expected.push_row(0.5, vec!["1.5".to_string()]).unwrap();

    let runner = RunnerBuilder::new()
        .with_model(echo_model())
        .with_factory(Box::new(EchoFactory::default()))
        .with_inputs(inputs)
        .with_expected(expected)
        .build()
        .unwrap();

    let report = runner.run_once(0);
    assert!(report.failure.is_none());
    assert!(report.passed());
}

#[test]
fn malformed_input_cell_is_skipped() {
    // "fast" fails the Real parse; the set is skipped, so y_real keeps its
    // default and the run itself is not aborted.
    let mut inputs = Table::new(vec!["u_real".to_string()]);
    inputs.push_row(0.0, vec!["fast".to_string()]).unwrap();

    let mut expected = Table::new(vec!["y_real".to_string()]);
    expected.push_row(0.5, vec!["0".to_string()]).unwrap();

    let runner = RunnerBuilder::new()
        .with_model(echo_model())
        .with_factory(Box::new(EchoFactory::default()))
        .with_inputs(inputs)
        .with_expected(expected)
        .build()
        .unwrap();

    let report = runner.run_once(0);
    assert!(report.failure.is_none());
    assert!(report.passed());
}

#[test]
fn validation_requires_exact_timestamp_by_default() {
    let mut inputs = Table::new(vec!["u_real".to_string()]);
    inputs.push_row(0.0, vec!["1.5".to_string()]).unwrap();
    inputs.push_row(0.5, vec!["2.5".to_string()]).unwrap();

    // 1.1999999 never matches the cursor exactly; 1.2 does (0.5 then 0.7)
    let mut near_miss = Table::new(vec!["y_real".to_string()]);
    near_miss
        .push_row(1.1999999, vec!["2.5".to_string()])
        .unwrap();

    let runner = RunnerBuilder::new()
        .with_model(echo_model())
        .with_factory(Box::new(EchoFactory::default()))
        .with_inputs(inputs.clone())
        .with_expected(near_miss)
        .with_config(RunConfig {
            default_step_size: 0.7,
            ..RunConfig::default()
        })
        .build()
        .unwrap();

    let report = runner.run_once(0);
    assert!(report.records.is_empty());

    let mut exact = Table::new(vec!["y_real".to_string()]);
    exact.push_row(1.2, vec!["2.5".to_string()]).unwrap();

    let runner = RunnerBuilder::new()
        .with_model(echo_model())
        .with_factory(Box::new(EchoFactory::default()))
        .with_inputs(inputs)
        .with_expected(exact)
        .with_config(RunConfig {
            default_step_size: 0.7,
            ..RunConfig::default()
        })
        .build()
        .unwrap();

    let report = runner.run_once(0);
    assert_eq!(report.records.len(), 1);
    assert_eq!(report.records[0].outcome, Outcome::Pass);
    assert_eq!(report.records[0].time, 1.2);
}

#[test]
fn mismatch_is_recorded_not_fatal() {
    let mut inputs = Table::new(vec!["u_real".to_string()]);
    inputs.push_row(0.0, vec!["1.5".to_string()]).unwrap();
    inputs.push_row(0.5, vec!["2.5".to_string()]).unwrap();

    let mut expected = Table::new(vec!["y_real".to_string()]);
    expected.push_row(0.5, vec!["9.9".to_string()]).unwrap();
    expected.push_row(1.0, vec!["2.5".to_string()]).unwrap();

    let runner = RunnerBuilder::new()
        .with_model(echo_model())
        .with_factory(Box::new(EchoFactory::default()))
        .with_inputs(inputs)
        .with_expected(expected)
        .build()
        .unwrap();

    let report = runner.run_once(0);

    assert!(report.failure.is_none());
    assert_eq!(report.steps_completed, 2);
    assert_eq!(report.records.len(), 2);
    assert_eq!(report.records[0].outcome, Outcome::Fail);
    assert_eq!(report.records[1].outcome, Outcome::Pass);
    assert!(!report.passed());
}

#[test]
fn real_tolerance_is_opt_in() {
    let mut inputs = Table::new(vec!["u_real".to_string()]);
    inputs.push_row(0.0, vec!["1.5".to_string()]).unwrap();

    let mut expected = Table::new(vec!["y_real".to_string()]);
    expected
        .push_row(0.5, vec!["1.5000001".to_string()])
        .unwrap();

    let mut builder = RunnerBuilder::new();
    builder
        .with_model(echo_model())
        .with_factory(Box::new(EchoFactory::default()))
        .with_inputs(inputs.clone())
        .with_expected(expected.clone());
    let report = builder.build().unwrap().run_once(0);
    assert_eq!(report.records[0].outcome, Outcome::Fail);

    let mut builder = RunnerBuilder::new();
    builder
        .with_model(echo_model())
        .with_factory(Box::new(EchoFactory::default()))
        .with_inputs(inputs)
        .with_expected(expected)
        .with_config(RunConfig {
            real_tolerance: Some(1e-3),
            ..RunConfig::default()
        });
    let report = builder.build().unwrap().run_once(0);
    assert_eq!(report.records[0].outcome, Outcome::Pass);
}
