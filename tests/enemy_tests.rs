//! Enemy tests - patterns, mitigation, statuses and encounters

use cascade_quest::core::enemy::{scaled_stats, ActionKind};
use cascade_quest::core::{Enemy, EnemyGroup, SimpleRng};
use cascade_quest::types::{EnemySpecies, StatusKind};

#[test]
fn test_slime_pattern_cycles() {
    let mut slime = Enemy::with_stats(EnemySpecies::Slime, 100, 10, 1.0);
    assert_eq!(slime.intent().name, "Basic Attack");

    assert_eq!(slime.emit().kind, ActionKind::Attack(10));
    assert_eq!(slime.emit().kind, ActionKind::Attack(8));
    // Regenerate at full HP restores nothing but still goes out
    assert_eq!(slime.emit().kind, ActionKind::Heal(20));
    assert_eq!(slime.intent().name, "Basic Attack");
}

#[test]
fn test_timer_drives_emission() {
    let mut goblin = Enemy::with_stats(EnemySpecies::Goblin, 30, 10, 2.0);
    assert!(goblin.update(1.5).action.is_none());
    assert!((goblin.timer_progress() - 0.75).abs() < 1e-6);

    let tick = goblin.update(0.5);
    let action = tick.action.expect("goblin should act at its interval");
    assert_eq!(action.name, "Quick Stab");
    assert_eq!(action.kind.damage(), Some(7));
    assert_eq!(goblin.attack_timer(), 0.0);
}

#[test]
fn test_guard_lasts_one_tick() {
    let mut orc = Enemy::with_stats(EnemySpecies::Orc, 100, 10, 1.0);
    orc.emit();
    orc.emit();
    assert_eq!(orc.emit().kind, ActionKind::Guard);
    assert!(orc.is_guarding());

    assert_eq!(orc.take_damage(21), 10);
    assert_eq!(orc.hp(), 90);

    // The next tick drops the guard even though nothing was emitted.
    assert!(orc.update(0.016).action.is_none());
    assert!(!orc.is_guarding());
    assert_eq!(orc.take_damage(21), 21);
}

#[test]
fn test_mitigated_hits_deal_at_least_one() {
    let mut golem = Enemy::with_stats(EnemySpecies::Golem, 50, 5, 1.0);
    golem
        .statuses_mut()
        .apply(StatusKind::DefenseBuff, 100.0, 10.0);
    assert_eq!(golem.take_damage(30), 1);
    // Unmitigated loss ignores defense
    assert_eq!(golem.lose_hp(9), 9);
    assert_eq!(golem.hp(), 40);
}

#[test]
fn test_attack_buff_sizes_intent() {
    let mut slime = Enemy::with_stats(EnemySpecies::Slime, 30, 10, 1.0);
    slime
        .statuses_mut()
        .apply(StatusKind::AttackBuff, 50.0, 10.0);
    assert_eq!(slime.intent().kind, ActionKind::Attack(15));
}

#[test]
fn test_stun_freezes_timer() {
    let mut slime = Enemy::with_stats(EnemySpecies::Slime, 30, 10, 1.0);
    slime.statuses_mut().apply(StatusKind::Stun, 0.0, 2.0);

    assert!(slime.update(1.5).action.is_none());
    assert_eq!(slime.attack_timer(), 0.0);
    assert!(slime.is_stunned());
}

#[test]
fn test_poison_ticks_whole_points() {
    let mut slime = Enemy::with_stats(EnemySpecies::Slime, 30, 10, 100.0);
    slime.statuses_mut().apply(StatusKind::Poison, 5.0, 10.0);

    assert_eq!(slime.update(1.0).poison, 5);
    assert_eq!(slime.hp(), 25);
}

#[test]
fn test_floor_scaling() {
    assert_eq!(scaled_stats(EnemySpecies::Slime, 1), (16, 6, 7.2));
    let (hp, dmg, interval) = scaled_stats(EnemySpecies::Orc, 3);
    assert_eq!((hp, dmg), (51, 16));
    assert!((interval - 4.86).abs() < 1e-4);
}

#[test]
fn test_selection_skips_dead_enemies() {
    let mut group = EnemyGroup::from_enemies([
        Enemy::with_stats(EnemySpecies::Slime, 20, 5, 5.0),
        Enemy::with_stats(EnemySpecies::Goblin, 60, 5, 5.0),
        Enemy::with_stats(EnemySpecies::Orc, 40, 5, 5.0),
    ]);
    group.get_mut(1).unwrap().lose_hp(60);

    assert!(group.select_next());
    assert_eq!(group.selected_index(), 2);
    assert!(!group.select_at(15, 1));
    assert!(group.select_at(3, 4));
    assert_eq!(group.selected_index(), 0);
    assert!(!group.select_at(3, 5));
    assert_eq!(group.strongest_living(), Some(2));

    group.get_mut(0).unwrap().lose_hp(20);
    group.snap_selection();
    assert_eq!(group.selected_index(), 2);
    assert_eq!(group.living_count(), 1);
}

#[test]
fn test_generated_encounters_are_seeded() {
    for seed in 1..20 {
        let a = EnemyGroup::generate(1, &mut SimpleRng::new(seed));
        let b = EnemyGroup::generate(1, &mut SimpleRng::new(seed));
        assert_eq!(a.len(), b.len());
        assert!((1..=2).contains(&a.len()));
        for (x, y) in a.iter().zip(b.iter()) {
            assert_eq!(x.species(), y.species());
            assert_eq!(x.max_hp(), y.max_hp());
            assert!(matches!(
                x.species(),
                EnemySpecies::Slime | EnemySpecies::Goblin
            ));
        }
    }
}
