//! Drives the Dahlquist test equation against its closed-form decay.

use cosim::components::dahlquist::{self, DahlquistFactory};
use cosim::loader::table_from_csv;
use cosim::runner::{RunConfig, RunnerBuilder};

const INPUTS: &str = "\
time
0.0
0.5
";

// Ten Euler substeps of 0.1 from x0 = 1: x = 0.9^10 = 0.34867844...
const EXPECTED: &str = "\
time,x,k
1.0,0.34867844,1
";

#[test]
fn decay_matches_the_closed_form() {
    let runner = RunnerBuilder::new()
        .with_model(dahlquist::model_description())
        .with_factory(Box::new(DahlquistFactory::default()))
        .with_inputs(table_from_csv(INPUTS).unwrap())
        .with_expected(table_from_csv(EXPECTED).unwrap())
        .with_config(RunConfig {
            run_count: 2,
            real_tolerance: Some(1e-6),
            ..RunConfig::default()
        })
        .build()
        .unwrap();

    let reports = runner.run_all();

    for report in &reports {
        assert!(report.passed(), "{}", report);
        assert_eq!(report.steps_completed, 2);
        assert_eq!(report.records.len(), 2);
    }
}
