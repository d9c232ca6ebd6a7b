use cascade_quest::core::{BattleConfig, BattleController, BattleSnapshot, Enemy, EnemyGroup, Player};
use cascade_quest::term::battle_view::color_rgb;
use cascade_quest::term::{encode_diff_into, encode_full_into, BattleView, FrameBuffer, Viewport};
use cascade_quest::types::{BattlePhase, EnemySpecies, ENEMY_SLOT_H};

fn live_battle() -> BattleController {
    let config = BattleConfig {
        countdown: false,
        ..BattleConfig::default()
    };
    let mut battle = BattleController::with_enemies(
        config,
        Player::default(),
        EnemyGroup::from_enemies([
            Enemy::with_stats(EnemySpecies::Slime, 16, 6, 7.2),
            Enemy::with_stats(EnemySpecies::Goblin, 20, 8, 4.8),
        ]),
    );
    battle.update(1.0 / 60.0);
    battle
}

fn row(fb: &FrameBuffer, y: u16) -> String {
    (0..fb.width()).filter_map(|x| fb.get(x, y)).map(|c| c.ch).collect()
}

#[test]
fn term_view_centers_board_frame() {
    let battle = live_battle();
    let view = BattleView::default();
    let vp = Viewport::new(80, 24);
    let fb = view.render(&battle.snapshot(), vp);

    let (ox, oy) = view.arena_origin(vp);
    assert_eq!((ox, oy), (19, 2));

    let by = oy + ENEMY_SLOT_H + 1;
    assert_eq!(fb.get(ox, by).unwrap().ch, '┌');
    assert_eq!(fb.get(ox + 13, by).unwrap().ch, '┐');
    assert_eq!(fb.get(ox, by + 13).unwrap().ch, '└');
    assert_eq!(fb.get(ox + 13, by + 13).unwrap().ch, '┘');
}

#[test]
fn term_view_draws_live_pair_two_chars_wide() {
    let battle = live_battle();
    let snap = battle.snapshot();
    let main = snap.pair[0];
    assert_eq!((main.pos.x, main.pos.y), (3, 1));

    let view = BattleView::default();
    let vp = Viewport::new(80, 24);
    let fb = view.render(&snap, vp);
    let (ox, oy) = view.arena_origin(vp);
    let by = oy + ENEMY_SLOT_H + 1;

    // Inside the border each grid cell is two characters wide.
    let x0 = ox + 1 + 3 * 2;
    let y0 = by + 1 + 1;
    for x in [x0, x0 + 1] {
        let cell = fb.get(x, y0).unwrap();
        assert_eq!(cell.ch, '█');
        assert_eq!(cell.style.fg, color_rgb(main.color));
    }
}

#[test]
fn term_view_lists_both_enemies() {
    let battle = live_battle();
    let view = BattleView::default();
    let vp = Viewport::new(80, 24);
    let fb = view.render(&battle.snapshot(), vp);
    let (_, oy) = view.arena_origin(vp);

    let names = row(&fb, oy);
    assert!(names.contains("▶Slime"));
    assert!(names.contains("Goblin"));
}

#[test]
fn term_view_small_terminal_does_not_panic() {
    let battle = live_battle();
    let view = BattleView::default();
    let fb = view.render(&battle.snapshot(), Viewport::new(10, 4));
    assert_eq!((fb.width(), fb.height()), (10, 4));
}

#[test]
fn term_view_defeat_overlay() {
    let mut snap = BattleSnapshot::default();
    snap.phase = BattlePhase::Defeat;
    let view = BattleView::default();
    let vp = Viewport::new(80, 24);
    let fb = view.render(&snap, vp);

    let (_, oy) = view.arena_origin(vp);
    let by = oy + ENEMY_SLOT_H + 1;
    assert!(row(&fb, by + 7).contains("DEFEAT"));
}

#[test]
fn term_diff_of_identical_frames_is_smaller_than_full() {
    let battle = live_battle();
    let view = BattleView::default();
    let vp = Viewport::new(80, 24);
    let snap = battle.snapshot();
    let a = view.render(&snap, vp);
    let b = view.render(&snap, vp);

    let mut full = Vec::new();
    encode_full_into(&a, &mut full).unwrap();
    let mut diff = Vec::new();
    encode_diff_into(&a, &b, &mut diff).unwrap();

    assert!(!full.is_empty());
    assert!(diff.len() < full.len());
}
