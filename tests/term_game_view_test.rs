use aqua_match::engine::{GameSession, SessionConfig};
use aqua_match::term::{GameView, HudState, Viewport};
use aqua_match::types::GamePhase;

fn playing_session() -> GameSession {
    let mut session = GameSession::seeded(SessionConfig::default(), 5).unwrap();
    session.init_level(1).unwrap();
    session
}

#[test]
fn term_view_renders_border_corners() {
    let snap = playing_session().snapshot();
    let view = GameView::default();

    // 8 columns * 3 chars plus border = 26 wide, 12 rows plus border = 14 tall.
    // The 26-wide side panel is centered with it in a 52-wide viewport.
    let fb = view.render(&snap, &HudState::default(), Viewport::new(52, 14));

    assert_eq!(fb.get(0, 0).unwrap().ch, '┌');
    assert_eq!(fb.get(25, 0).unwrap().ch, '┐');
    assert_eq!(fb.get(0, 13).unwrap().ch, '└');
    assert_eq!(fb.get(25, 13).unwrap().ch, '┘');
}

#[test]
fn term_view_draws_bottom_row_above_lower_border() {
    let mut session = playing_session();
    session.replace_layout(&["m"]).unwrap();
    let snap = session.snapshot();

    let fb = GameView::default().render(&snap, &HudState::default(), Viewport::new(52, 14));

    // Row 0 sits on the last line inside the frame; glyph centered in its cell.
    assert_eq!(fb.get(2, 12).unwrap().ch, '*');
    assert_eq!(fb.get(2, 1).unwrap().ch, ' ');
}

#[test]
fn term_view_shows_pause_overlay() {
    let mut session = playing_session();
    session.pause().unwrap();
    let snap = session.snapshot();
    assert_eq!(snap.phase, GamePhase::Paused);

    let fb = GameView::default().render(&snap, &HudState::default(), Viewport::new(80, 24));
    let text: String = (0..fb.height()).map(|y| fb.row_text(y)).collect();
    assert!(text.contains("PAUSED"));
    assert!(text.contains("WATER good"));
}
