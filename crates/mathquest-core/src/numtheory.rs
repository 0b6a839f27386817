//! Integer helpers used by the generators and the evaluator.

/// Greatest common divisor (Euclid). `gcd(0, 0)` is 0.
pub fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        let r = a % b;
        a = b;
        b = r;
    }
    a
}

/// Least common multiple. Returns 0 if either input is 0.
pub fn lcm(a: u64, b: u64) -> u64 {
    if a == 0 || b == 0 {
        return 0;
    }
    a / gcd(a, b) * b
}

/// GCD of a whole set, folded left to right.
pub fn gcd_all(values: &[u64]) -> u64 {
    values.iter().copied().fold(0, gcd)
}

/// LCM of a whole set, folded left to right. Empty input gives 1.
pub fn lcm_all(values: &[u64]) -> u64 {
    values.iter().copied().fold(1, lcm)
}

/// Prime factors of `n` with multiplicity, ascending.
///
/// Trial division from 2: each divisor is divided out completely before
/// moving on, stopping once `d` passes the square root of what is left. A leftover above 1
/// is itself prime. `n < 2` has no factors.
pub fn prime_factors(n: u64) -> Vec<u64> {
    let mut factors = Vec::new();
    let mut rest = n;
    let mut d = 2u64;
    while rest > 1 && d <= rest / d {
        while rest % d == 0 {
            factors.push(d);
            rest /= d;
        }
        d += 1;
    }
    if rest > 1 {
        factors.push(rest);
    }
    factors
}

/// Number of distinct primes in the factorization of `n`.
pub fn distinct_prime_count(n: u64) -> usize {
    let mut factors = prime_factors(n);
    factors.dedup();
    factors.len()
}

pub fn is_prime(n: u64) -> bool {
    if n < 2 {
        return false;
    }
    let mut d = 2u64;
    while d <= n / d {
        if n % d == 0 {
            return false;
        }
        d += 1;
    }
    true
}

/// All positive divisors of `n`, ascending. Empty for 0.
pub fn divisors(n: u64) -> Vec<u64> {
    let mut low = Vec::new();
    let mut high = Vec::new();
    let mut d = 1u64;
    while d <= n / d {
        if n % d == 0 {
            low.push(d);
            if d != n / d {
                high.push(n / d);
            }
        }
        d += 1;
    }
    low.extend(high.into_iter().rev());
    low
}

/// Twin-prime partners of `n`: the primes at `n - 2` and `n + 2`.
///
/// Empty unless `n` is itself prime.
pub fn twin_primes(n: u64) -> Vec<u64> {
    if !is_prime(n) {
        return Vec::new();
    }
    let mut partners = Vec::new();
    if n > 2 && is_prime(n - 2) {
        partners.push(n - 2);
    }
    if is_prime(n + 2) {
        partners.push(n + 2);
    }
    partners
}
