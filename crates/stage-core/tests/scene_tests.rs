mod common;

use common::{capture_logs, warnings};
use glam::{Vec2, Vec3};
use stage_core::*;
use std::cell::Cell;
use std::rc::Rc;

fn rgb(hex: &str) -> Rgb {
    Rgb::from_hex(hex).unwrap()
}

fn noop() -> ClickHandler {
    Rc::new(|| {})
}

fn ground(scene: &mut SceneGraph) -> NodeId {
    scene.add_colored_plane(
        "#556b2f",
        Vec3::new(0.0, -7.0, -3.0),
        Vec2::new(100.0, 6.0),
        "darkGreenPlane",
    )
}

#[test]
fn colored_plane_is_registered_by_name() {
    let mut scene = SceneGraph::default();
    let id = ground(&mut scene);
    assert_eq!(scene.lookup("darkGreenPlane"), Some(id));
    let obj = scene.get(id).unwrap();
    assert_eq!(obj.tint().to_hex(), "#556b2f");
    assert_eq!(obj.size, Vec2::new(100.0, 6.0));
    assert_eq!(scene.roots(), &[id]);
}

#[test]
fn missing_colour_uses_fallback() {
    let mut scene = SceneGraph::new(rgb("#ff00ff"));
    capture_logs();
    let id = scene.add_colored_plane("", Vec3::ZERO, Vec2::ONE, "blank");
    assert_eq!(scene.get(id).unwrap().tint().to_hex(), "#ff00ff");
    let warned = warnings();
    assert_eq!(warned.len(), 1, "{:?}", warned);
    assert!(warned[0].contains("blank"), "{}", warned[0]);
}

#[test]
fn reusing_a_name_replaces_the_object() {
    let mut scene = SceneGraph::default();
    let first = ground(&mut scene);
    let second = scene.add_colored_plane("#000000", Vec3::ZERO, Vec2::ONE, "darkGreenPlane");
    assert_eq!(scene.len(), 1);
    assert!(!scene.contains(first));
    assert_eq!(scene.lookup("darkGreenPlane"), Some(second));
}

#[test]
fn decorative_attaches_under_parent() {
    let mut scene = SceneGraph::default();
    let parent = ground(&mut scene);
    let child = scene
        .attach_decorative(
            TextureHandle::new(0),
            Vec3::new(1.0, 4.0, 0.5),
            Vec2::new(3.0, 2.0),
            rgb("#556b2f"),
            "darkGreenPlane",
        )
        .unwrap();
    assert_eq!(scene.children(parent), &[child]);
    assert_eq!(scene.get(child).unwrap().parent(), Some(parent));
    assert_eq!(scene.world_position(child), Some(Vec3::new(1.0, -3.0, -2.5)));
    assert_eq!(scene.get(child).unwrap().kind.texture(), Some(TextureHandle::new(0)));
}

#[test]
fn children_follow_parent_moves() {
    let mut scene = SceneGraph::default();
    ground(&mut scene);
    let child = scene
        .attach_decorative(
            TextureHandle::new(0),
            Vec3::new(1.0, 4.0, 0.0),
            Vec2::ONE,
            Rgb::WHITE,
            "darkGreenPlane",
        )
        .unwrap();
    assert!(scene.move_object("darkGreenPlane", Vec3::new(2.0, -7.0, -3.0)));
    assert_eq!(scene.world_position(child), Some(Vec3::new(3.0, -3.0, -3.0)));
    assert!(!scene.move_object("nowhere", Vec3::ZERO));
}

#[test]
fn decorative_with_missing_parent_fails_without_mutation() {
    let mut scene = SceneGraph::default();
    ground(&mut scene);
    let err = scene
        .attach_decorative(TextureHandle::new(0), Vec3::ZERO, Vec2::ONE, Rgb::WHITE, "nope")
        .unwrap_err();
    assert_eq!(err, SceneError::ParentNotFound("nope".to_string()));
    assert_eq!(scene.len(), 1);
}

#[test]
fn interactive_control_is_unit_sized_and_registered() {
    let mut scene = SceneGraph::default();
    let id = scene
        .attach_interactive(
            "modeToggle",
            TextureHandle::new(1),
            Rgb::WHITE,
            Vec3::new(4.0, 2.0, 0.0),
            noop(),
            None,
        )
        .unwrap();
    assert_eq!(scene.interactive_ids(), &[id]);
    assert_eq!(scene.get(id).unwrap().size, Vec2::ONE);
    assert!(scene.get(id).unwrap().kind.click_handler().is_some());
}

#[test]
fn interactive_control_with_missing_parent_is_rejected() {
    let mut scene = SceneGraph::default();
    let err = scene
        .attach_interactive(
            "modeToggle",
            TextureHandle::new(1),
            Rgb::WHITE,
            Vec3::ZERO,
            noop(),
            Some("nope"),
        )
        .unwrap_err();
    assert!(matches!(err, SceneError::ParentNotFound(_)));
    assert!(scene.interactive_ids().is_empty());
    assert!(scene.is_empty());
}

#[test]
fn removal_clears_registry_and_subtree() {
    let mut scene = SceneGraph::default();
    let parent = ground(&mut scene);
    let control = scene
        .attach_interactive(
            "button",
            TextureHandle::new(1),
            Rgb::WHITE,
            Vec3::ZERO,
            noop(),
            Some("darkGreenPlane"),
        )
        .unwrap();
    let deco = scene
        .attach_decorative(
            TextureHandle::new(0),
            Vec3::ZERO,
            Vec2::ONE,
            Rgb::WHITE,
            "darkGreenPlane",
        )
        .unwrap();
    assert!(scene.remove_object("darkGreenPlane"));
    for id in [parent, control, deco] {
        assert!(!scene.contains(id));
    }
    assert!(scene.interactive_ids().is_empty());
    assert_eq!(scene.lookup("button"), None);
    assert!(scene.is_empty());
}

#[test]
fn removing_unknown_name_changes_nothing() {
    let mut scene = SceneGraph::default();
    scene
        .attach_interactive(
            "modeToggle",
            TextureHandle::new(1),
            Rgb::WHITE,
            Vec3::ZERO,
            noop(),
            None,
        )
        .unwrap();
    assert!(!scene.remove_object("ghost"));
    assert_eq!(scene.interactive_ids().len(), 1);
    assert_eq!(scene.len(), 1);
}

#[test]
fn stale_ids_do_not_resolve_after_slot_reuse() {
    let mut scene = SceneGraph::default();
    let old = scene.add_colored_plane("#000000", Vec3::ZERO, Vec2::ONE, "a");
    scene.remove_object("a");
    let new = scene.add_colored_plane("#ffffff", Vec3::ZERO, Vec2::ONE, "b");
    assert!(!scene.contains(old));
    assert!(scene.contains(new));
    assert!(!scene.set_scale(old, 2.0));
}

#[test]
fn tint_fades_over_duration() {
    let mut scene = SceneGraph::default();
    let id = scene.add_colored_plane("#000000", Vec3::ZERO, Vec2::ONE, "plane");
    assert!(scene.animate_tint(id, rgb("#ffffff"), 0.2));
    scene.advance(10.0);
    assert_eq!(scene.get(id).unwrap().tint().to_hex(), "#000000");
    scene.advance(10.05);
    assert_eq!(scene.get(id).unwrap().tint().to_hex(), "#404040");
    assert!(scene.is_animating(id));
    scene.advance(10.25);
    assert_eq!(scene.get(id).unwrap().tint().to_hex(), "#ffffff");
    assert!(!scene.is_animating(id));
}

#[test]
fn new_fade_supersedes_running_one() {
    let mut scene = SceneGraph::default();
    let id = scene.add_colored_plane("#000000", Vec3::ZERO, Vec2::ONE, "plane");
    scene.animate_tint(id, rgb("#ffffff"), 0.2);
    scene.advance(0.0);
    scene.advance(0.1);
    let midway = scene.get(id).unwrap().tint();

    scene.animate_tint(id, rgb("#000000"), 0.2);
    assert_eq!(scene.active_transitions(), 1);
    assert_eq!(scene.transition(id).unwrap().from, midway);
    assert_eq!(scene.settled_tint(id).unwrap().to_hex(), "#000000");

    scene.advance(0.1);
    scene.advance(0.4);
    assert_eq!(scene.get(id).unwrap().tint().to_hex(), "#000000");
    assert_eq!(scene.active_transitions(), 0);
}

#[test]
fn zero_duration_fade_snaps() {
    let mut scene = SceneGraph::default();
    let id = scene.add_colored_plane("#000000", Vec3::ZERO, Vec2::ONE, "plane");
    scene.animate_tint(id, rgb("#123456"), 0.0);
    scene.advance(1.0);
    assert_eq!(scene.get(id).unwrap().tint().to_hex(), "#123456");
}

#[test]
fn child_added_mid_fade_joins_parent() {
    let mut scene = SceneGraph::default();
    let parent = ground(&mut scene);
    scene.animate_tint(parent, rgb("#37412a"), 0.2);
    scene.advance(0.0);
    let child = scene
        .attach_decorative(
            TextureHandle::new(0),
            Vec3::ZERO,
            Vec2::ONE,
            rgb("#556b2f"),
            "darkGreenPlane",
        )
        .unwrap();
    assert!(scene.is_animating(child));
    scene.advance(0.3);
    assert_eq!(scene.get(child).unwrap().tint().to_hex(), "#37412a");
    assert_eq!(scene.get(parent).unwrap().tint().to_hex(), "#37412a");
}

#[test]
fn sync_snaps_idle_child_to_parent() {
    let mut scene = SceneGraph::default();
    let parent = ground(&mut scene);
    let child = scene
        .attach_decorative(
            TextureHandle::new(0),
            Vec3::ZERO,
            Vec2::ONE,
            rgb("#ffffff"),
            "darkGreenPlane",
        )
        .unwrap();
    assert!(scene.sync_tint_with_parent(child));
    assert_eq!(scene.get(child).unwrap().tint(), scene.get(parent).unwrap().tint());
}

#[test]
fn removed_objects_drop_their_fades() {
    let mut scene = SceneGraph::default();
    let id = ground(&mut scene);
    scene.animate_tint(id, Rgb::BLACK, 0.2);
    scene.remove_object("darkGreenPlane");
    assert_eq!(scene.active_transitions(), 0);
    scene.advance(1.0);
}

#[test]
fn draw_list_is_back_to_front_with_scale() {
    let mut scene = SceneGraph::default();
    scene.add_colored_plane(
        "#00bfff",
        Vec3::new(0.0, 9.0, -8.0),
        Vec2::new(100.0, 6.0),
        "darkBlueSky",
    );
    scene.add_colored_plane(
        "#add8e6",
        Vec3::new(0.0, 1.0, -10.0),
        Vec2::new(100.0, 6.0),
        "lightBlueSky",
    );
    let id = scene
        .attach_interactive(
            "modeToggle",
            TextureHandle::new(3),
            Rgb::WHITE,
            Vec3::new(4.0, 2.0, 0.0),
            noop(),
            None,
        )
        .unwrap();
    scene.set_scale(id, 1.1);

    let draws = scene.draw_list();
    let zs: Vec<f32> = draws.iter().map(|d| d.center.z).collect();
    assert_eq!(zs, vec![-10.0, -8.0, 0.0]);
    let toggle = draws.last().unwrap();
    assert_eq!(toggle.texture, Some(TextureHandle::new(3)));
    assert!((toggle.half_size.x - 0.55).abs() < 1e-6);
    assert_eq!(draws[0].texture, None);
}

#[test]
fn click_handler_is_shared_not_consumed() {
    let mut scene = SceneGraph::default();
    let clicks = Rc::new(Cell::new(0));
    let counter = clicks.clone();
    let id = scene
        .attach_interactive(
            "button",
            TextureHandle::new(0),
            Rgb::WHITE,
            Vec3::ZERO,
            Rc::new(move || counter.set(counter.get() + 1)),
            None,
        )
        .unwrap();
    let handler = scene.get(id).unwrap().kind.click_handler().cloned().unwrap();
    handler();
    handler();
    assert_eq!(clicks.get(), 2);
}

#[test]
fn parent_scale_carries_to_children() {
    let mut scene = SceneGraph::default();
    let parent = scene
        .attach_interactive(
            "panel",
            TextureHandle::new(0),
            Rgb::WHITE,
            Vec3::new(1.0, 0.0, 0.0),
            noop(),
            None,
        )
        .unwrap();
    let child = scene
        .attach_decorative(
            TextureHandle::new(1),
            Vec3::new(2.0, 0.0, 0.0),
            Vec2::ONE,
            Rgb::WHITE,
            "panel",
        )
        .unwrap();
    scene.set_scale(parent, 2.0);
    assert_eq!(scene.world_scale(child), Some(2.0));
    assert_eq!(scene.world_position(child), Some(Vec3::new(5.0, 0.0, 0.0)));
    let (_, half) = scene.world_quad(child).unwrap();
    assert_eq!(half, Vec2::ONE);
}
