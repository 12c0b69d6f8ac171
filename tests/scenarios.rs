//! End-to-end shots against hand-built boards

use std::f32::consts::FRAC_PI_2;

use bubble_arena::consts::SIM_DT;
use bubble_arena::sim::{Cell, Element, GridSession, LayoutEntry, SessionPhase, TickResult};
use bubble_arena::SessionConfig;
use glam::Vec2;

fn config_with_launcher(x: f32) -> SessionConfig {
    SessionConfig {
        launcher: Some(Vec2::new(x, 560.0)),
        ..SessionConfig::new(400.0, 600.0, 20.0, 44.0)
    }
}

fn run_until_settled(session: &mut GridSession) -> TickResult {
    for _ in 0..10_000 {
        let result = session.advance(SIM_DT);
        if result != TickResult::StillFlying {
            return result;
        }
    }
    panic!("shot never settled");
}

fn column_x(session: &GridSession, cell: Cell) -> f32 {
    session.lattice().world_position_of(cell).x
}

#[test]
fn test_fire_cluster_under_water_pops_and_drops() {
    // Three rows of five Fire with a single Water in the middle of row 1
    let water = Cell::new(1, 2);
    let layout: Vec<LayoutEntry> = (0..3)
        .flat_map(|row| (0..5).map(move |col| (row, col)))
        .map(|(row, col)| {
            let element = if Cell::new(row, col) == water {
                Element::Water
            } else {
                Element::Fire
            };
            LayoutEntry::new(row, col, element)
        })
        .collect();

    let preview = GridSession::start(SessionConfig::new(400.0, 600.0, 20.0, 44.0), &layout).unwrap();
    assert_eq!(preview.lattice().spacing(), 44.0);
    let x = column_x(&preview, water);

    let mut session = GridSession::start(config_with_launcher(x), &layout).unwrap();
    assert_eq!(session.lattice().len(), 15);
    session.validate_invariants().unwrap();

    session.fire(FRAC_PI_2, Element::Fire).unwrap();
    let TickResult::Settled { cell, removed } = run_until_settled(&mut session) else {
        panic!("expected the shot to settle");
    };

    // Attached below the bottom row, in line with the Water column
    assert_ne!(cell, water);
    assert_eq!(cell, Cell::new(3, 2));
    // 14 Fire plus the shot pop; the orphaned Water drops
    assert_eq!(removed.len(), 16);
    assert!(session.snapshot().is_empty());
    assert_eq!(session.phase(), SessionPhase::Won);
    assert_eq!(session.score(), 15 * 10 + 20);
}

#[test]
fn test_fourth_match_removes_exactly_the_run() {
    let layout = [
        LayoutEntry::new(0, 0, Element::Water),
        LayoutEntry::new(0, 1, Element::Water),
        LayoutEntry::new(0, 2, Element::Water),
        LayoutEntry::new(0, 6, Element::Earth),
        LayoutEntry::new(0, 7, Element::Earth),
    ];
    let preview = GridSession::start(config_with_launcher(0.0), &layout).unwrap();
    let x = column_x(&preview, Cell::new(0, 3));

    let mut session = GridSession::start(config_with_launcher(x), &layout).unwrap();
    let handle = session.fire(FRAC_PI_2, Element::Water).unwrap();
    let TickResult::Settled { cell, removed } = run_until_settled(&mut session) else {
        panic!("expected the shot to settle");
    };

    assert_eq!(cell, Cell::new(0, 3));
    assert_eq!(removed.len(), 4);
    assert!(removed.contains(&handle.id()));
    assert_eq!(
        session.snapshot(),
        vec![
            (Cell::new(0, 6), Element::Earth),
            (Cell::new(0, 7), Element::Earth)
        ]
    );
}

#[test]
fn test_popping_the_only_connector_drops_the_group_below() {
    // Water at (0, 3) and (0, 4) holds up five Earth; Air elsewhere on the
    // anchor row stays put.
    let layout = [
        LayoutEntry::new(0, 3, Element::Water),
        LayoutEntry::new(0, 4, Element::Water),
        LayoutEntry::new(0, 8, Element::Air),
        LayoutEntry::new(1, 3, Element::Earth),
        LayoutEntry::new(2, 3, Element::Earth),
        LayoutEntry::new(2, 4, Element::Earth),
        LayoutEntry::new(3, 3, Element::Earth),
        LayoutEntry::new(3, 4, Element::Earth),
    ];
    let preview = GridSession::start(config_with_launcher(0.0), &layout).unwrap();
    let x = column_x(&preview, Cell::new(0, 2));

    let mut session = GridSession::start(config_with_launcher(x), &layout).unwrap();
    assert_eq!(session.lattice().len(), 8);
    session.fire(FRAC_PI_2, Element::Water).unwrap();
    let TickResult::Settled { cell, removed } = run_until_settled(&mut session) else {
        panic!("expected the shot to settle");
    };

    assert_eq!(cell, Cell::new(0, 2));
    assert_eq!(removed.len(), 3 + 5);
    assert_eq!(session.snapshot(), vec![(Cell::new(0, 8), Element::Air)]);
    assert_eq!(session.score(), 3 * 10 + 5 * 20);
    session.validate_invariants().unwrap();
}

#[test]
fn test_dense_board_never_produces_an_overlap() {
    // Fill every in-bounds cell of the top seven rows with alternating
    // elements so no cluster exists before the shot.
    let elements = [Element::Fire, Element::Water, Element::Earth, Element::Air];
    let layout: Vec<LayoutEntry> = (0..7)
        .flat_map(|row| (0..9).map(move |col| (row, col)))
        .map(|(row, col)| LayoutEntry::new(row, col, elements[((row * 2 + col) % 4) as usize]))
        .collect();

    for angle in [0.3_f32, 0.9, FRAC_PI_2, 2.2, 2.8] {
        let mut session = GridSession::start(config_with_launcher(200.0), &layout).unwrap();
        session.fire(angle, Element::Fire).unwrap();
        match run_until_settled(&mut session) {
            TickResult::Settled { cell, .. } => {
                assert!(session.lattice().in_bounds(cell));
            }
            TickResult::PlacementExhausted => {
                assert_eq!(session.phase(), SessionPhase::Lost);
            }
            other => panic!("unexpected result {other:?}"),
        }
        session.validate_invariants().unwrap();
    }
}

#[test]
fn test_sessions_are_independent() {
    let layout = [LayoutEntry::new(0, 0, Element::Fire)];
    let mut a = GridSession::start(config_with_launcher(200.0), &layout).unwrap();
    let b = GridSession::start(config_with_launcher(200.0), &layout).unwrap();

    a.fire(FRAC_PI_2, Element::Air).unwrap();
    run_until_settled(&mut a);

    assert_eq!(a.lattice().len(), 2);
    assert_eq!(b.lattice().len(), 1);
    assert_eq!(b.phase(), SessionPhase::Aiming);
}

#[test]
fn test_full_board_exhausts_placement_and_loses() {
    // Every in-bounds cell filled; entries past the bottom wall are skipped
    let layout: Vec<LayoutEntry> = (0..20)
        .flat_map(|row| (0..10).map(move |col| (row, col)))
        .map(|(row, col)| {
            let element = Element::ALL[((row + col) % 4) as usize];
            LayoutEntry::new(row, col, element)
        })
        .collect();
    let mut session = GridSession::start(SessionConfig::new(400.0, 600.0, 20.0, 44.0), &layout).unwrap();
    let before = session.snapshot();
    assert_eq!(before.len(), 128);

    session.fire(FRAC_PI_2, Element::Fire).unwrap();
    assert_eq!(run_until_settled(&mut session), TickResult::PlacementExhausted);

    assert_eq!(session.phase(), SessionPhase::Lost);
    assert!(session.flying().is_none());
    assert_eq!(session.snapshot(), before);
    session.validate_invariants().unwrap();
}
