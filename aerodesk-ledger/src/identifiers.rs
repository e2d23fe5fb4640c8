use rand::Rng;

const ALPHANUMERIC: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

fn alphanumeric<R: Rng + ?Sized>(rng: &mut R, len: usize) -> String {
    (0..len)
        .map(|_| ALPHANUMERIC[rng.gen_range(0..ALPHANUMERIC.len())] as char)
        .collect()
}

/// Six uppercase letters or digits, e.g. `Q7X2LM`.
pub fn reservation_code<R: Rng + ?Sized>(rng: &mut R) -> String {
    alphanumeric(rng, 6)
}

/// `PAY` followed by six digits.
pub fn payment_id<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!("PAY{}", rng.gen_range(100_000..=999_999))
}

pub fn transaction_reference<R: Rng + ?Sized>(rng: &mut R) -> String {
    alphanumeric(rng, 12)
}
