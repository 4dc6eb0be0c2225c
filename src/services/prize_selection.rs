//! 转盘抽奖：几何落点 + 可用性校验 + 重抽
//!
//! 纯函数，不读写数据库；计数由调用方在确认中奖后单独提交。

use crate::config::SelectionMode;
use crate::entities::prize_entity as prizes;
use chrono::{DateTime, Utc};
use rand::Rng;
use rand::distributions::{Distribution, WeightedIndex};
use rand::seq::SliceRandom;

/// 动画额外转的整圈数
const FULL_TURNS: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Selection {
    /// 中奖扇区下标
    pub index: usize,
    /// 转盘停止时的旋转角度 (度)
    pub rotation: f64,
    /// 几何落点不可用，已改抽其它可用奖品
    pub rerolled: bool,
}

/// 旋转角度 -> 扇区下标；指针在顶部，扇区等分 360 度
pub fn index_for_rotation(rotation: f64, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    let arc = 360.0 / len as f64;
    let degrees = (rotation + 90.0).rem_euclid(360.0);
    (((360.0 - degrees) / arc).floor() as usize) % len
}

/// 扇区下标 -> 一个落在该扇区内部的旋转角度
pub fn rotation_for_index<R: Rng + ?Sized>(index: usize, len: usize, rng: &mut R) -> f64 {
    let arc = 360.0 / len.max(1) as f64;
    // 避开扇区边界
    let offset = rng.gen_range(0.1..0.9) * arc;
    let x = index as f64 * arc + offset;
    (270.0 - x).rem_euclid(360.0) + FULL_TURNS * 360.0
}

fn geometric_pick<R: Rng + ?Sized>(
    list: &[prizes::Model],
    mode: SelectionMode,
    rng: &mut R,
) -> (usize, f64) {
    let len = list.len();
    match mode {
        SelectionMode::UniformArc => {
            let rotation = rng.gen_range(0.0..360.0) + FULL_TURNS * 360.0;
            (index_for_rotation(rotation, len), rotation)
        }
        SelectionMode::Weighted => {
            let index = match WeightedIndex::new(list.iter().map(|p| p.weight())) {
                Ok(dist) => dist.sample(rng),
                // 权重全为 0 时退化为等概率
                Err(_) => rng.gen_range(0..len),
            };
            (index, rotation_for_index(index, len, rng))
        }
    }
}

/// 从奖品列表中抽出一个；空列表返回 None
///
/// 落点奖品不可用时在所有可用奖品中等概率重抽；若没有任何可用奖品，
/// 仍返回原落点奖品。
pub fn select_prize<R: Rng + ?Sized>(
    list: &[prizes::Model],
    now: DateTime<Utc>,
    mode: SelectionMode,
    rng: &mut R,
) -> Option<Selection> {
    if list.is_empty() {
        return None;
    }

    let (index, rotation) = geometric_pick(list, mode, rng);
    if list[index].is_available(now) {
        return Some(Selection {
            index,
            rotation,
            rerolled: false,
        });
    }

    let available: Vec<usize> = (0..list.len())
        .filter(|&i| list[i].is_available(now))
        .collect();

    match available.choose(rng) {
        Some(&alt) => Some(Selection {
            index: alt,
            rotation: rotation_for_index(alt, list.len(), rng),
            rerolled: true,
        }),
        None => {
            log::warn!(
                "No available prize among {} configured, keeping geometric pick",
                list.len()
            );
            Some(Selection {
                index,
                rotation,
                rerolled: false,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{LimitPeriod, PrizeTier};
    use chrono::{Duration, TimeZone};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap()
    }

    fn prize(id: i64, name: &str, chance: i32) -> prizes::Model {
        prizes::Model {
            id,
            restaurant_id: 1,
            name: name.to_string(),
            chance,
            tier: PrizeTier::Common,
            color: None,
            current_count: 0,
            limit_count: None,
            limit_period: LimitPeriod::Total,
            expiration_date: None,
            counter_reset_at: None,
            created_at: None,
            updated_at: None,
        }
    }

    fn exhausted(id: i64, name: &str) -> prizes::Model {
        prizes::Model {
            current_count: 5,
            limit_count: Some(5),
            ..prize(id, name, 10)
        }
    }

    #[test]
    fn test_rotation_maps_back_to_index() {
        let mut rng = StdRng::seed_from_u64(1);
        for len in 1..=12 {
            for index in 0..len {
                let rotation = rotation_for_index(index, len, &mut rng);
                assert_eq!(index_for_rotation(rotation, len), index);
            }
        }
    }

    #[test]
    fn test_pointer_at_top_is_first_slice() {
        // rotation 270 => degrees 0 => 360/arc = len => index 0
        assert_eq!(index_for_rotation(270.0, 4), 0);
        // 差一点回到 0 度时落在最后一个扇区
        assert_eq!(index_for_rotation(271.0, 4), 3);
    }

    #[test]
    fn test_empty_list_returns_none() {
        let mut rng = StdRng::seed_from_u64(2);
        assert!(select_prize(&[], now(), SelectionMode::UniformArc, &mut rng).is_none());
        assert!(select_prize(&[], now(), SelectionMode::Weighted, &mut rng).is_none());
    }

    #[test]
    fn test_all_available_never_rerolls() {
        let list = vec![prize(1, "A", 10), prize(2, "B", 20), prize(3, "C", 0)];
        let mut rng = StdRng::seed_from_u64(3);
        for mode in [SelectionMode::UniformArc, SelectionMode::Weighted] {
            for _ in 0..200 {
                let s = select_prize(&list, now(), mode, &mut rng).unwrap();
                assert!(s.index < list.len());
                assert!(!s.rerolled);
                assert_eq!(index_for_rotation(s.rotation, list.len()), s.index);
            }
        }
    }

    #[test]
    fn test_unavailable_pick_rerolls_to_available() {
        let mut expired = prize(2, "B", 10);
        expired.expiration_date = Some((now() - Duration::days(1)).date_naive());
        let list = vec![prize(1, "A", 10), expired, exhausted(3, "C")];
        let mut rng = StdRng::seed_from_u64(4);
        let mut saw_reroll = false;
        for _ in 0..300 {
            let s = select_prize(&list, now(), SelectionMode::UniformArc, &mut rng).unwrap();
            assert_eq!(s.index, 0);
            assert_eq!(index_for_rotation(s.rotation, list.len()), 0);
            saw_reroll |= s.rerolled;
        }
        assert!(saw_reroll);
    }

    #[test]
    fn test_expiring_today_is_still_available() {
        let mut today = prize(1, "A", 10);
        today.expiration_date = Some(now().date_naive());
        let mut rng = StdRng::seed_from_u64(5);
        let s = select_prize(&[today], now(), SelectionMode::UniformArc, &mut rng).unwrap();
        assert!(!s.rerolled);
    }

    #[test]
    fn test_only_exhausted_prize_is_returned_unchanged() {
        let list = vec![exhausted(1, "B")];
        let mut rng = StdRng::seed_from_u64(6);
        let s = select_prize(&list, now(), SelectionMode::Weighted, &mut rng).unwrap();
        assert_eq!(list[s.index].name, "B");
        assert!(!s.rerolled);
    }

    #[test]
    fn test_none_available_keeps_original_pick() {
        let list = vec![exhausted(1, "A"), exhausted(2, "B"), exhausted(3, "C")];
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let s = select_prize(&list, now(), SelectionMode::UniformArc, &mut rng).unwrap();
            assert!(!s.rerolled);
            assert_eq!(index_for_rotation(s.rotation, list.len()), s.index);
        }
    }

    #[test]
    fn test_weighted_mode_honors_zero_weight() {
        let list = vec![prize(1, "A", 0), prize(2, "B", 5)];
        let mut rng = StdRng::seed_from_u64(8);
        for _ in 0..200 {
            let s = select_prize(&list, now(), SelectionMode::Weighted, &mut rng).unwrap();
            assert_eq!(s.index, 1);
        }
    }

    #[test]
    fn test_weighted_mode_all_zero_falls_back_to_uniform() {
        let list = vec![prize(1, "A", 0), prize(2, "B", 0)];
        let mut rng = StdRng::seed_from_u64(9);
        let mut seen = [false; 2];
        for _ in 0..200 {
            let s = select_prize(&list, now(), SelectionMode::Weighted, &mut rng).unwrap();
            seen[s.index] = true;
        }
        assert!(seen[0] && seen[1]);
    }

    #[test]
    fn test_weighted_mode_survives_huge_chances() {
        let list = vec![
            prize(1, "A", i32::MAX),
            prize(2, "B", i32::MAX),
            prize(3, "C", i32::MAX),
        ];
        let mut rng = StdRng::seed_from_u64(10);
        let mut seen = [false; 3];
        for _ in 0..300 {
            let s = select_prize(&list, now(), SelectionMode::Weighted, &mut rng).unwrap();
            assert_eq!(index_for_rotation(s.rotation, list.len()), s.index);
            seen[s.index] = true;
        }
        assert!(seen.iter().all(|&hit| hit));
    }
}
