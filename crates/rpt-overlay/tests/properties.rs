//! Property tests for stacking, drag clamping and resize limits

use proptest::prelude::*;

use rpt_overlay::{
    calculate_resize, clamp_to_viewport, CloseReason, Coordinator, OverlayConfig, OverlayId,
    ResizeEdge, Size, Vec2, ViewHost, MIN_HEIGHT, MIN_WIDTH,
};
use rpt_view::{Input, Key, ListenerKind};
use rpt_view_mock::HeadlessHost;

const OVERLAYS: usize = 4;

#[derive(Clone, Debug)]
enum Op {
    Open(usize),
    Close(usize),
    Toggle(usize),
    Front(usize),
    Escape,
    Tick,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..OVERLAYS).prop_map(Op::Open),
        (0..OVERLAYS).prop_map(Op::Close),
        (0..OVERLAYS).prop_map(Op::Toggle),
        (0..OVERLAYS).prop_map(Op::Front),
        Just(Op::Escape),
        Just(Op::Tick),
    ]
}

fn setup() -> (Coordinator<HeadlessHost>, Vec<OverlayId>) {
    let mut c = Coordinator::new(HeadlessHost::new());
    let ids = (0..OVERLAYS)
        .map(|i| {
            c.create(OverlayConfig {
                modal: i % 2 == 0,
                ..OverlayConfig::new(format!("o{i}"))
            })
            .unwrap()
        })
        .collect();
    (c, ids)
}

fn edge_strategy() -> impl Strategy<Value = ResizeEdge> {
    prop_oneof![
        Just(ResizeEdge::Right),
        Just(ResizeEdge::Bottom),
        Just(ResizeEdge::Corner),
    ]
}

proptest! {
    #[test]
    fn stack_invariants_hold(ops in prop::collection::vec(op_strategy(), 1..40)) {
        let (mut c, ids) = setup();
        let mut now = 0.0;

        for op in ops {
            now += 50.0;
            let open_before: Vec<bool> = ids
                .iter()
                .map(|id| c.get(id).unwrap().is_open())
                .collect();

            match op {
                Op::Open(i) => { c.open(&ids[i], now); }
                Op::Close(i) => { c.close(&ids[i], CloseReason::CloseButton, now); }
                Op::Toggle(i) => { c.toggle(&ids[i], now); }
                Op::Front(i) => {
                    c.bring_to_front(&ids[i]);
                    let open_after: Vec<bool> = ids
                        .iter()
                        .map(|id| c.get(id).unwrap().is_open())
                        .collect();
                    prop_assert_eq!(&open_before, &open_after);
                }
                Op::Escape => {
                    if let Some(escape) = c.escape_listener() {
                        let top = c.top().cloned();
                        c.handle_input(
                            escape,
                            Input::KeyDown { key: Key::Escape, shift: false },
                            now,
                        );
                        for (i, id) in ids.iter().enumerate() {
                            if Some(id) != top.as_ref() {
                                prop_assert_eq!(c.get(id).unwrap().is_open(), open_before[i]);
                            }
                        }
                    }
                }
                Op::Tick => { c.tick(now); }
            }

            let z: Vec<i32> = c
                .stack()
                .iter()
                .map(|id| c.z_index_of(id).unwrap())
                .collect();
            prop_assert!(z.windows(2).all(|w| w[0] < w[1]), "z not increasing: {:?}", z);

            let expected = c
                .stack()
                .iter()
                .filter_map(|id| c.get(id))
                .any(|o| o.is_open() && o.is_modal());
            prop_assert_eq!(c.any_modal_open(), expected);
            prop_assert_eq!(c.host().background_overflow() == "hidden", expected);
        }
    }

    #[test]
    fn clamp_keeps_panel_inside(
        x in -5000.0f32..5000.0,
        y in -5000.0f32..5000.0,
        w in 1.0f32..1280.0,
        h in 1.0f32..800.0,
    ) {
        let viewport = Size::new(1280.0, 800.0);
        let pos = clamp_to_viewport(Vec2::new(x, y), Size::new(w, h), viewport);
        prop_assert!(pos.x >= 0.0 && pos.x <= viewport.width - w);
        prop_assert!(pos.y >= 0.0 && pos.y <= viewport.height - h);
    }

    #[test]
    fn drag_session_stays_in_viewport(
        moves in prop::collection::vec((-3000.0f32..3000.0, -3000.0f32..3000.0), 1..20),
    ) {
        let mut c = Coordinator::new(HeadlessHost::new());
        let id = c
            .create(OverlayConfig {
                size: Some(Size::new(400.0, 300.0)),
                ..OverlayConfig::new("drag")
            })
            .unwrap();
        c.open(&id, 0.0);
        c.tick(200.0);

        let header = c.get(&id).unwrap().view().header;
        let down = c.host().listeners_on(header, ListenerKind::PointerDown)[0];
        c.handle_input(down, Input::PointerDown { x: 450.0, y: 260.0 }, 300.0);

        let document = c.host().document();
        let pointer_move = c.host().listeners_on(document, ListenerKind::PointerMove)[0];
        for (x, y) in moves {
            c.handle_input(pointer_move, Input::PointerMove { x, y }, 310.0);
        }
        let up = c.host().listeners_on(document, ListenerKind::PointerUp)[0];
        c.handle_input(up, Input::PointerUp, 320.0);

        let pos = c.get(&id).unwrap().position().unwrap();
        prop_assert!(pos.x >= 0.0 && pos.x <= 1280.0 - 400.0);
        prop_assert!(pos.y >= 0.0 && pos.y <= 800.0 - 300.0);
    }

    #[test]
    fn resize_never_below_minimum(
        edge in edge_strategy(),
        width in 0.0f32..2000.0,
        height in 0.0f32..2000.0,
        dx in -3000.0f32..3000.0,
        dy in -3000.0f32..3000.0,
    ) {
        let size = calculate_resize(edge, Size::new(width, height), Vec2::new(dx, dy));
        prop_assert!(size.width >= MIN_WIDTH);
        prop_assert!(size.height >= MIN_HEIGHT);
    }
}
