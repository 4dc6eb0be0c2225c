use rand::Rng;

/// 随机生成 #rrggbb 颜色（用于未指定颜色的奖品扇区）
pub fn random_hex_color<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!("#{:06x}", rng.gen_range(0..=0xFFFFFFu32))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_random_hex_color() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let color = random_hex_color(&mut rng);
            assert_eq!(color.len(), 7);
            assert!(color.starts_with('#'));
            assert!(color[1..].chars().all(|c| c.is_ascii_hexdigit()));
        }
    }
}
