//! Prints the runtime type and address of each level of a nested wrapper
//! chain, then evaluates the outermost level through a trait object.
//!
//! Run with: cargo run --bin nested_hierarchy

use vec_bench_demos::hierarchy::{chain_reports, Evaluate, Level0, Level1, Level2Derived, Point};
use vec_bench_demos::logging;

fn main() {
    logging::init();

    let p = Point { x: 2.0, y: 3.0 };
    let l0 = Level0;
    let l1 = Level1::new(&l0);
    let l2 = Level2Derived::new(&l1);

    for block in chain_reports(&l1, &l2) {
        for report in block {
            println!("{report:#}");
        }
        println!();
    }

    let evaluator: &dyn Evaluate = &l2;
    tracing::debug!(evaluator = std::any::type_name_of_val(evaluator), "dispatching");
    println!("{}", evaluator.evaluate(&p));
}
