//! Prime table sizes. A prime slot count keeps `identity % size` from
//! folding structured identities onto a few slots.

/// Deterministic primality test (6k±1 trial division).
pub fn is_prime(n: u64) -> bool {
    if n < 2 {
        return false;
    }
    if n < 4 {
        return true;
    }
    if n % 2 == 0 || n % 3 == 0 {
        return false;
    }
    let mut i = 5u64;
    while i.saturating_mul(i) <= n {
        if n % i == 0 || n % (i + 2) == 0 {
            return false;
        }
        i += 6;
    }
    true
}

/// The `n` smallest primes strictly greater than `x`.
pub fn primes_above(x: u64, n: usize) -> Vec<u64> {
    let mut out = Vec::with_capacity(n);
    let mut candidate = x;
    while out.len() < n {
        candidate = match candidate.checked_add(1) {
            Some(c) => c,
            None => break,
        };
        if is_prime(candidate) {
            out.push(candidate);
        }
    }
    out
}

/// Smallest prime strictly greater than `x`.
pub fn next_prime_above(x: u64) -> Option<u64> {
    primes_above(x, 1).first().copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_primes() {
        let primes: Vec<u64> = (0..30).filter(|&n| is_prime(n)).collect();
        assert_eq!(primes, vec![2, 3, 5, 7, 11, 13, 17, 19, 23, 29]);
    }

    #[test]
    fn strictly_above() {
        assert_eq!(next_prime_above(1000), Some(1009));
        assert_eq!(next_prime_above(7), Some(11));
        assert_eq!(primes_above(1_000_000, 3), vec![1_000_003, 1_000_033, 1_000_037]);
    }

    #[test]
    fn exhausted_range() {
        assert_eq!(next_prime_above(u64::MAX), None);
    }
}
