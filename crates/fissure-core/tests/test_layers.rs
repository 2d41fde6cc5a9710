use fissure_core::layer::{Layer, LayerStack};
use ndarray::Array2;

fn stack_with_layers(count: usize) -> LayerStack {
    let mut stack = LayerStack::new();
    for _ in 0..count {
        stack.push_raster(Array2::zeros((4, 4)), None);
    }
    stack
}

#[test]
fn test_palette_cycle_repeats_last_color() {
    let stack = stack_with_layers(9);
    assert_eq!(stack.get(0).unwrap().color, [255, 255, 255]);
    assert_eq!(stack.get(1).unwrap().color, [255, 0, 0]);
    assert_eq!(stack.get(6).unwrap().color, [255, 0, 255]);
    // Past the palette end the last color repeats.
    assert_eq!(stack.get(7).unwrap().color, [255, 0, 255]);
    assert_eq!(stack.get(8).unwrap().color, [255, 0, 255]);
}

#[test]
fn test_auto_names_follow_insertion_index() {
    let stack = stack_with_layers(3);
    assert_eq!(stack.get(0).unwrap().name, "overlay-0");
    assert_eq!(stack.get(2).unwrap().name, "overlay-2");
}

#[test]
fn test_select_active_swaps_whole_records() {
    let mut stack = stack_with_layers(4);
    stack.get_mut(2).unwrap().opacity = 0.25;
    stack.select_active(2).unwrap();

    // The record moved with all of its styling.
    assert_eq!(stack.active().unwrap().name, "overlay-2");
    assert_eq!(stack.active().unwrap().opacity, 0.25);
    assert_eq!(stack.get(2).unwrap().name, "overlay-0");
}

#[test]
fn test_select_active_twice_restores_order() {
    let mut stack = stack_with_layers(4);
    let names: Vec<String> = stack.iter().map(|l| l.name.clone()).collect();
    stack.select_active(3).unwrap();
    stack.select_active(3).unwrap();
    let after: Vec<String> = stack.iter().map(|l| l.name.clone()).collect();
    assert_eq!(names, after);
}

#[test]
fn test_select_active_out_of_range() {
    let mut stack = stack_with_layers(2);
    assert!(stack.select_active(2).is_err());
    assert_eq!(stack.active().unwrap().name, "overlay-0");
}

#[test]
fn test_clear_keeps_only_active_layer() {
    let mut stack = stack_with_layers(5);
    stack.select_active(3).unwrap();
    stack.clear();
    assert_eq!(stack.len(), 1);
    assert_eq!(stack.active().unwrap().name, "overlay-3");
}

#[test]
fn test_create_empty_makes_zeroed_active_raster() {
    let mut stack = LayerStack::new();
    stack.create_empty(6, 4);
    let active = stack.active().unwrap();
    assert_eq!(active.data.dim(), (4, 6));
    assert!(active.data.iter().all(|&v| v == 0));
    assert_eq!(active.name, "newly_created_overlay.png");
}

#[test]
fn test_create_empty_keeps_existing_styling() {
    let mut stack = stack_with_layers(1);
    stack.active_mut().unwrap().set_opacity(0.5).unwrap();
    stack.create_empty(3, 3);
    assert_eq!(stack.active().unwrap().opacity, 0.5);
    assert_eq!(stack.len(), 1);
}

#[test]
fn test_styling_setters_reject_out_of_range() {
    let mut layer = Layer::new(Array2::zeros((2, 2)), [255, 0, 0], "l".to_string());
    assert!(layer.set_opacity(1.5).is_err());
    assert!(layer.set_opacity(-0.1).is_err());
    layer.set_opacity(0.7).unwrap();
    assert_eq!(layer.opacity, 0.7);

    assert!(layer.set_brightness(10.5).is_err());
    layer.set_brightness(2.0).unwrap();
    // A rejected value leaves the previous one in place.
    assert!(layer.set_brightness(-1.0).is_err());
    assert_eq!(layer.brightness, 2.0);
}
