// tests/integration_test.rs
use approx::assert_abs_diff_eq;
use mc_option_pricer::analytics::bs_analytic;
use mc_option_pricer::batch::{run_batch, BatchConfig};
use mc_option_pricer::mc::mc_engine::{mc_price_option_gbm, price_european_call_mc, McConfig};
use mc_option_pricer::mc::payoffs::Payoff;
use mc_option_pricer::params::OptionParams;
use mc_option_pricer::records::load_records;
use mc_option_pricer::rng::Xorshift32;
use std::path::Path;

#[test]
fn test_bs_mc_vs_analytic() {
    let params = OptionParams::new(100.0, 100.0, 0.05, 0.2, 1.0);
    let mut rng = Xorshift32::new(123_456);

    let mc_price = price_european_call_mc(&mut rng, &params, 1_000_000).expect("Valid parameters");
    let analytic_price = bs_analytic::price_european_call_analytic(&params).expect("Valid parameters");

    let rel_error = (mc_price - analytic_price).abs() / analytic_price;

    println!("\nMC Price: {}", mc_price);
    println!("Analytic Price: {}", analytic_price);
    println!("Relative Error: {}", rel_error);

    assert_abs_diff_eq!(analytic_price, 10.4506, epsilon = 1e-4);
    assert!(rel_error < 0.01, "Relative error exceeds 1%: {}", rel_error);
}

#[test]
fn test_parallel_workers_vs_analytic() {
    let cfg = McConfig {
        paths: 1_000_000,
        seed: 123_456,
        workers: 4,
        ..Default::default()
    };
    let estimate = mc_price_option_gbm(&cfg).expect("Valid configuration");
    let analytic_price = bs_analytic::bs_call_price(100.0, 100.0, 0.05, 0.2, 1.0).unwrap();

    let rel_error = (estimate.price - analytic_price).abs() / analytic_price;
    assert!(rel_error < 0.01, "Relative error exceeds 1%: {}", rel_error);

    // standard error of the payoff mean is ≈ 14.7 / √n
    assert!(
        estimate.std_error() > 0.01 && estimate.std_error() < 0.02,
        "unexpected standard error {}",
        estimate.std_error()
    );
}

#[test]
fn test_identical_seed_gives_identical_price() {
    let params = OptionParams::new(42.0, 40.0, 0.03, 0.35, 0.5);
    let run = || {
        let mut rng = Xorshift32::new(987_654);
        price_european_call_mc(&mut rng, &params, 100_000).unwrap()
    };
    assert_eq!(run().to_bits(), run().to_bits());
}

#[test]
fn test_low_volatility_both_pricers_reach_forward_intrinsic() {
    let params = OptionParams::new(100.0, 100.0, 0.05, 0.0001, 1.0);
    let expected = 100.0 - 100.0 * (-0.05f64).exp();

    let analytic = bs_analytic::price_european_call_analytic(&params).unwrap();
    let mut rng = Xorshift32::new(123_456);
    let mc = price_european_call_mc(&mut rng, &params, 100_000).unwrap();

    assert_abs_diff_eq!(expected, 4.877, epsilon = 1e-3);
    assert_abs_diff_eq!(analytic, expected, epsilon = 1e-6);
    assert_abs_diff_eq!(mc, expected, epsilon = 1e-2);
}

#[test]
fn test_deep_out_of_the_money_is_worthless() {
    let params = OptionParams::new(100.0, 1_000.0, 0.05, 0.2, 1.0);

    let analytic = bs_analytic::price_european_call_analytic(&params).unwrap();
    let mut rng = Xorshift32::new(5);
    let mc = price_european_call_mc(&mut rng, &params, 200_000).unwrap();

    assert_abs_diff_eq!(analytic, 0.0, epsilon = 1e-9);
    assert_abs_diff_eq!(mc, 0.0, epsilon = 1e-6);
}

#[test]
fn test_deep_in_the_money_tracks_forward_intrinsic() {
    let params = OptionParams::new(100.0, 10.0, 0.05, 0.2, 1.0);
    let expected = params.call_lower_bound();

    let analytic = bs_analytic::price_european_call_analytic(&params).unwrap();
    let mut rng = Xorshift32::new(6);
    let mc = price_european_call_mc(&mut rng, &params, 200_000).unwrap();

    assert_abs_diff_eq!(analytic, expected, epsilon = 1e-8);
    // S_T has a standard deviation of ≈ 21, so the standard error is ≈ 0.05
    assert_abs_diff_eq!(mc, expected, epsilon = 0.25);
}

#[test]
fn test_put_call_parity_across_pricers() {
    let call = McConfig {
        paths: 500_000,
        seed: 77,
        s0: 100.0,
        payoff: Payoff::EuropeanCall { k: 105.0 },
        ..Default::default()
    };
    let put = McConfig {
        payoff: Payoff::EuropeanPut { k: 105.0 },
        ..call.clone()
    };

    let c = mc_price_option_gbm(&call).unwrap();
    let p = mc_price_option_gbm(&put).unwrap();

    // Same seed, same draws: C - P = S0 - K e^{-rT} up to the sampling error of E[S_T]
    let forward_gap = 100.0 - 105.0 * (-0.05f64).exp();
    assert_abs_diff_eq!(c.price - p.price, forward_gap, epsilon = 0.2);
}

#[test]
fn test_batch_over_sample_file() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("data/real_stocks.csv");
    let loaded = load_records(&path).expect("sample data is readable");

    assert_eq!(loaded.accepted_count(), 15);
    assert_eq!(loaded.skipped_count(), 0);

    let cfg = BatchConfig {
        paths: 50_000,
        seed: 42,
        workers: 1,
    };
    let report = run_batch(&loaded.records, &cfg).unwrap();
    assert_eq!(report.rows.len(), 15);
    assert!(report.failed.is_empty());

    for row in &report.rows {
        assert!(row.mc_price >= 0.0);
        assert!(row.bs_price >= 0.0);
        // 6 standard errors is generous for a single estimate
        assert!(
            (row.mc_price - row.bs_price).abs() < 6.0 * row.mc_std_error + 1e-9,
            "{}: MC {} vs BS {} (se {})",
            row.ticker,
            row.mc_price,
            row.bs_price,
            row.mc_std_error
        );
    }
}
