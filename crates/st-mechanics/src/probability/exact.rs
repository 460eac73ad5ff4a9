//! Exact combinatorial success probabilities.
//!
//! A d10 against a difficulty lands in one of four categories: a ten, a
//! plain success, a one, or a plain failure. A roll succeeds when its
//! successes minus its ones reach the target, so summing the multinomial
//! weight of every qualifying `(tens, successes, ones)` split gives the exact
//! probability.

/// Probability that a single die shows a ten.
const P_TEN: f64 = 0.1;
/// Probability that a single die shows a one.
const P_ONE: f64 = 0.1;

/// `n` choose `k`, as a float.
fn choose(n: u32, k: u32) -> f64 {
    let k = k.min(n - k);
    (0..k).fold(1.0, |acc, i| acc * f64::from(n - i) / f64::from(i + 1))
}

/// `n! / (a! b! c! (n-a-b-c)!)`.
fn multinomial(n: u32, a: u32, b: u32, c: u32) -> f64 {
    choose(n, a) * choose(n - a, b) * choose(n - a - b, c)
}

/// Probability of at least `target` net successes.
///
/// With `specialty`, tens count double. Targets of zero or less always
/// succeed.
pub fn success_probability(pool: u32, difficulty: u32, target: i32, specialty: bool) -> f64 {
    if target <= 0 {
        return 1.0;
    }

    let p_success = f64::from(10 - difficulty) / 10.0;
    let p_fail = f64::from(difficulty - 2) / 10.0;
    let mut total = 0.0;

    for successes in 0..=pool {
        for tens in 0..=(pool - successes) {
            let weight = if specialty { 2 } else { 1 };
            let hits = (successes + tens * weight) as i32;
            let margin = hits - target;
            if margin < 0 {
                continue;
            }

            let remaining = pool - successes - tens;
            let max_ones = (margin as u32).min(remaining);
            for ones in 0..=max_ones {
                let fails = remaining - ones;
                total += multinomial(pool, tens, successes, ones)
                    * P_TEN.powi(tens as i32)
                    * p_success.powi(successes as i32)
                    * P_ONE.powi(ones as i32)
                    * p_fail.powi(fails as i32);
            }
        }
    }

    total
}

/// Probability that the dice alone botch: no successes and at least one one.
pub fn botch_probability(pool: u32, difficulty: u32) -> f64 {
    if pool == 1 {
        return P_ONE;
    }

    let p_plain_fail = f64::from(difficulty - 2) / 10.0;
    let mixed: f64 = (1..pool)
        .map(|k| {
            choose(pool, k) * P_ONE.powi(k as i32) * p_plain_fail.powi((pool - k) as i32)
        })
        .sum();

    mixed + P_ONE.powi(pool as i32)
}
