use std::cell::Cell;

use approx::assert_relative_eq;

use super::*;

fn quadratic(x: &[f64]) -> f64 {
    (x[0] - 3.0).powi(2) + (x[1] + 1.0).powi(2)
}

fn double_well(x: &[f64]) -> f64 {
    (x[0] * x[0] - 4.0).powi(2) + x[0]
}

fn bounded<'f>(algorithm: Algorithm, dim: usize, lower: f64, upper: f64) -> Context<'f> {
    let mut ctx = Context::new(algorithm, dim);
    ctx.set_lower_bounds(&vec![lower; dim]).unwrap();
    ctx.set_upper_bounds(&vec![upper; dim]).unwrap();
    ctx
}

#[test]
fn setters_check_length() {
    let mut ctx = Context::new(Algorithm::NelderMead, 2);

    assert_eq!(
        ctx.set_lower_bounds(&[0.0]),
        Err(ArgError::Length {
            expected: 2,
            actual: 1
        })
    );
    assert!(ctx.set_upper_bounds(&[1.0, 1.0, 1.0]).is_err());
    assert!(ctx.set_initial_step(&[1.0]).is_err());
}

#[test]
fn rejects_zero_steps() {
    let mut ctx = Context::new(Algorithm::Subplex, 2);
    assert_eq!(
        ctx.set_initial_step(&[1.0, 0.0]),
        Err(ArgError::Step {
            index: 1,
            value: 0.0
        })
    );
}

#[test]
fn missing_objective_is_invalid() {
    let mut ctx = Context::new(Algorithm::NelderMead, 2);
    let mut x = [1.0, 2.0];

    let outcome = ctx.optimize(&mut x);

    assert_eq!(outcome.code, ResultCode::InvalidArgs);
    assert!(outcome.score.is_nan());
    assert_eq!(outcome.evaluations, 0);
    assert_eq!(x, [1.0, 2.0]);
}

#[test]
fn inverted_bounds_are_invalid() {
    let mut ctx = Context::new(Algorithm::NelderMead, 1);
    ctx.set_lower_bounds(&[1.0]).unwrap();
    ctx.set_upper_bounds(&[-1.0]).unwrap();
    ctx.set_min_objective(|x: &[f64]| x[0]);

    assert_eq!(ctx.optimize(&mut [0.0]).code, ResultCode::InvalidArgs);
}

#[test]
fn negative_tolerance_is_invalid() {
    let mut ctx = bounded(Algorithm::NelderMead, 1, -1.0, 1.0);
    ctx.set_ftol_abs(-1e-3);
    ctx.set_min_objective(|x: &[f64]| x[0]);

    assert_eq!(ctx.optimize(&mut [0.0]).code, ResultCode::InvalidArgs);
}

#[test]
fn global_search_needs_finite_bounds_and_a_criterion() {
    let mut unbounded = Context::new(Algorithm::Esch, 1);
    unbounded.set_maxeval(100);
    unbounded.set_min_objective(|x: &[f64]| x[0]);
    assert_eq!(unbounded.optimize(&mut [0.0]).code, ResultCode::InvalidArgs);

    let mut endless = bounded(Algorithm::Esch, 1, -1.0, 1.0);
    endless.set_min_objective(|x: &[f64]| x[0]);
    assert_eq!(endless.optimize(&mut [0.0]).code, ResultCode::InvalidArgs);
}

#[test]
fn local_optimizer_must_be_local_and_same_dimension() {
    let mut global = Context::new(Algorithm::Esch, 2);

    assert_eq!(
        global.set_local_optimizer(Context::new(Algorithm::Esch, 2)),
        Err(ArgError::NotLocal {
            algorithm: Algorithm::Esch
        })
    );
    assert_eq!(
        global.set_local_optimizer(Context::new(Algorithm::NelderMead, 3)),
        Err(ArgError::LocalDimension {
            expected: 2,
            actual: 3
        })
    );
    assert!(
        global
            .set_local_optimizer(Context::new(Algorithm::Subplex, 2))
            .is_ok()
    );
}

#[test]
fn start_point_is_projected_onto_bounds() {
    let mut ctx = bounded(Algorithm::NelderMead, 2, -1.0, 1.0);
    ctx.set_maxeval(1);
    ctx.set_min_objective(quadratic);
    let mut x = [5.0, -7.0];

    let outcome = ctx.optimize(&mut x);

    assert_eq!(outcome.code, ResultCode::MaxevalReached);
    assert_eq!(x, [1.0, -1.0]);
    assert_relative_eq!(outcome.score, 4.0);
}

#[test]
fn local_algorithms_minimize_quadratic() {
    for algorithm in [Algorithm::NelderMead, Algorithm::Subplex] {
        let mut ctx = bounded(algorithm, 2, -10.0, 10.0);
        ctx.set_ftol_abs(1e-12);
        ctx.set_min_objective(quadratic);
        let mut x = [0.0, 0.0];

        let outcome = ctx.optimize(&mut x);

        assert!(outcome.code.is_success(), "{algorithm}: {:?}", outcome.code);
        assert_relative_eq!(x[0], 3.0, epsilon = 1e-4);
        assert_relative_eq!(x[1], -1.0, epsilon = 1e-4);
        assert!(outcome.score < 1e-8);
    }
}

#[test]
fn maximizes() {
    let mut ctx = bounded(Algorithm::NelderMead, 2, -10.0, 10.0);
    ctx.set_ftol_abs(1e-12);
    ctx.set_max_objective(|x: &[f64]| 5.0 - quadratic(x));
    let mut x = [0.0, 0.0];

    let outcome = ctx.optimize(&mut x);

    assert_relative_eq!(outcome.score, 5.0, epsilon = 1e-8);
    assert_relative_eq!(x[0], 3.0, epsilon = 1e-4);
}

#[test]
fn budget_is_exact_for_every_algorithm() {
    for algorithm in [Algorithm::NelderMead, Algorithm::Subplex, Algorithm::Esch] {
        let calls = Cell::new(0_u32);
        let mut ctx = bounded(algorithm, 2, -10.0, 10.0);
        ctx.set_maxeval(37);
        ctx.set_seed(3);
        ctx.set_min_objective(|x: &[f64]| {
            calls.set(calls.get() + 1);
            quadratic(x)
        });

        let outcome = ctx.optimize(&mut [0.0, 0.0]);

        assert_eq!(outcome.code, ResultCode::MaxevalReached, "{algorithm}");
        assert_eq!(outcome.evaluations, 37);
        assert_eq!(calls.get(), 37);
    }
}

#[test]
fn stopval_ends_on_the_first_good_evaluation() {
    let calls = Cell::new(0_u32);
    let first_hit = Cell::new(None);
    let mut ctx = bounded(Algorithm::Subplex, 2, -10.0, 10.0);
    ctx.set_stopval(1.0);
    ctx.set_min_objective(|x: &[f64]| {
        calls.set(calls.get() + 1);
        let f = quadratic(x);
        if f <= 1.0 && first_hit.get().is_none() {
            first_hit.set(Some(calls.get()));
        }
        f
    });

    let outcome = ctx.optimize(&mut [0.0, 0.0]);

    assert_eq!(outcome.code, ResultCode::StopvalReached);
    assert!(outcome.score <= 1.0);
    assert_eq!(first_hit.get(), Some(calls.get()));
}

#[test]
fn stop_handle_interrupts_after_in_flight_evaluation() {
    let calls = Cell::new(0_u32);
    let mut ctx = bounded(Algorithm::NelderMead, 2, -10.0, 10.0);
    let handle = ctx.stop_handle();
    ctx.set_min_objective(move |x: &[f64]| {
        calls.set(calls.get() + 1);
        if calls.get() == 3 {
            handle.force_stop();
        }
        quadratic(x)
    });

    let outcome = ctx.optimize(&mut [0.0, 0.0]);

    assert_eq!(outcome.code, ResultCode::ForcedStop);
    assert_eq!(outcome.evaluations, 3);
}

#[test]
fn forced_stop_is_cleared_between_runs() {
    let mut ctx = bounded(Algorithm::NelderMead, 1, -1.0, 1.0);
    ctx.set_maxeval(5);
    ctx.set_min_objective(|x: &[f64]| x[0]);
    ctx.force_stop();

    assert_eq!(ctx.optimize(&mut [0.0]).code, ResultCode::MaxevalReached);
}

#[test]
fn nan_everywhere_is_a_failure() {
    let mut ctx = bounded(Algorithm::NelderMead, 1, -1.0, 1.0);
    ctx.set_maxeval(10);
    ctx.set_min_objective(|_: &[f64]| f64::NAN);

    let outcome = ctx.optimize(&mut [0.0]);

    assert_eq!(outcome.code, ResultCode::Failure);
    assert_eq!(outcome.evaluations, 10);
}

#[test]
fn seeded_global_runs_repeat() {
    let run = || {
        let mut ctx = bounded(Algorithm::Esch, 1, -5.0, 5.0);
        ctx.set_maxeval(500);
        ctx.set_seed(11);
        ctx.set_min_objective(double_well);
        let mut x = [2.0];
        let outcome = ctx.optimize(&mut x);
        (x, outcome)
    };

    assert_eq!(run(), run());
}

#[test]
fn global_with_local_refinement_shares_the_budget() {
    let calls = Cell::new(0_u32);
    let count = |x: &[f64]| {
        calls.set(calls.get() + 1);
        double_well(x)
    };

    let mut global = bounded(Algorithm::Esch, 1, -5.0, 5.0);
    global.set_maxeval(1500);
    global.set_seed(5);
    global.set_min_objective(count);

    let mut local = bounded(Algorithm::NelderMead, 1, -5.0, 5.0);
    local.set_ftol_abs(1e-12);
    local.set_min_objective(count);
    global.set_local_optimizer(local).unwrap();

    let mut x = [2.0];
    let outcome = global.optimize(&mut x);

    // Minimum of the deeper (left) well.
    let x_min = -2.030_546_615_353_374;
    let f_min = double_well(&[x_min]);

    assert_eq!(outcome.code, ResultCode::MaxevalReached);
    assert_eq!(outcome.evaluations, 1500);
    assert_eq!(calls.get(), 1500);
    assert_relative_eq!(x[0], x_min, epsilon = 1e-4);
    assert_relative_eq!(outcome.score, f_min, epsilon = 1e-7);
}

#[test]
fn zero_tolerance_alone_cannot_end_a_global_search() {
    for (abs, rel) in [(Some(0.0), None), (None, Some(0.0)), (Some(0.0), Some(0.0))] {
        let mut ctx = bounded(Algorithm::Esch, 1, -5.0, 5.0);
        if let Some(abs) = abs {
            ctx.set_ftol_abs(abs);
        }
        if let Some(rel) = rel {
            ctx.set_ftol_rel(rel);
        }
        ctx.set_min_objective(|x: &[f64]| (x[0] - 1.0).abs().min(0.5));

        let outcome = ctx.optimize(&mut [0.0]);

        assert_eq!(outcome.code, ResultCode::InvalidArgs);
        assert_eq!(outcome.evaluations, 0);
    }

    let mut ctx = bounded(Algorithm::Esch, 1, -5.0, 5.0);
    ctx.set_ftol_abs(0.0);
    ctx.set_maxeval(50);
    ctx.set_min_objective(|x: &[f64]| x[0]);
    assert_eq!(ctx.optimize(&mut [0.0]).code, ResultCode::MaxevalReached);
}

#[test]
fn reports_algorithm_and_dimension() {
    let ctx = Context::new(Algorithm::Subplex, 4);
    assert_eq!(ctx.algorithm(), Algorithm::Subplex);
    assert_eq!(ctx.dimension(), 4);
}

#[test]
fn stopval_reached_during_local_refinement_ends_the_global_run() {
    let calls = Cell::new(0_u32);
    let count = |x: &[f64]| {
        calls.set(calls.get() + 1);
        quadratic(x)
    };

    let mut global = bounded(Algorithm::Esch, 2, -10.0, 10.0);
    global.set_maxeval(5000);
    global.set_stopval(1e-10);
    global.set_seed(8);
    global.set_min_objective(count);

    let mut local = bounded(Algorithm::NelderMead, 2, -10.0, 10.0);
    local.set_stopval(1e-10);
    local.set_min_objective(count);
    global.set_local_optimizer(local).unwrap();

    let mut x = [0.0, 0.0];
    let outcome = global.optimize(&mut x);

    // Random sampling alone does not get within 1e-10 of the minimum.
    assert!(calls.get() > 40);
    assert_eq!(outcome.code, ResultCode::StopvalReached);
    assert_eq!(outcome.evaluations, calls.get());
    assert!(outcome.score <= 1e-10);
    assert_relative_eq!(quadratic(&x), outcome.score);
}

#[test]
fn forced_stop_during_local_refinement_ends_the_global_run() {
    let calls = Cell::new(0_u32);
    let counted = &calls;

    // The population takes 40 evaluations, so the local run is stopped on
    // its third call.
    let mut local = bounded(Algorithm::NelderMead, 2, -10.0, 10.0);
    let handle = local.stop_handle();
    local.set_min_objective(move |x: &[f64]| {
        counted.set(counted.get() + 1);
        if counted.get() == 43 {
            handle.force_stop();
        }
        quadratic(x)
    });

    let mut global = bounded(Algorithm::Esch, 2, -10.0, 10.0);
    global.set_maxeval(5000);
    global.set_seed(8);
    global.set_min_objective(move |x: &[f64]| {
        counted.set(counted.get() + 1);
        quadratic(x)
    });
    global.set_local_optimizer(local).unwrap();

    let mut x = [0.0, 0.0];
    let outcome = global.optimize(&mut x);

    assert_eq!(outcome.code, ResultCode::ForcedStop);
    assert_eq!(calls.get(), 43);
    assert_eq!(outcome.evaluations, 43);
    assert!(x.iter().all(|xi| (-10.0..=10.0).contains(xi)));
    assert_relative_eq!(quadratic(&x), outcome.score);
}
