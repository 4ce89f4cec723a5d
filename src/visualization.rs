//! 3D visualization of a solution path using kiss3d.

use kiss3d::prelude::*;

use blocksworld::{Configuration, Pile};

/// Returns the display color for a block, keyed by its position in the
/// sorted block list so colors stay stable across path steps.
fn block_color(block_index: usize) -> Color {
    match block_index % 7 {
        0 => Color::new(1.0, 0.2, 0.2, 1.0), // red
        1 => Color::new(0.2, 1.0, 0.2, 1.0), // green
        2 => Color::new(0.2, 0.2, 1.0, 1.0), // blue
        3 => Color::new(1.0, 1.0, 0.2, 1.0), // yellow
        4 => Color::new(1.0, 0.2, 1.0, 1.0), // magenta
        5 => Color::new(0.2, 1.0, 1.0, 1.0), // cyan
        _ => Color::new(1.0, 0.6, 0.2, 1.0), // orange
    }
}

/// Builds the scene for one configuration.
///
/// Non-empty piles stand side by side along X in normalized order, blocks
/// rise along Y from the table at y = 0. The row is centered on the origin.
fn build_scene(
    scene: &mut SceneNode3d,
    configuration: &Configuration,
    palette: &[String],
) -> Vec<SceneNode3d> {
    /// Size of each rendered cube (slightly smaller than 1.0 for visible gaps).
    const CUBE_SIZE: f32 = 0.9;
    /// Spacing between piles.
    const PILE_SPACING: f32 = 1.5;

    let piles: Vec<&Pile> = configuration.normalized_piles();
    let center_offset = (piles.len().saturating_sub(1)) as f32 * PILE_SPACING / 2.0;

    let mut nodes = Vec::new();
    for (column, pile) in piles.iter().enumerate() {
        for (level, block) in pile.iter().enumerate() {
            let color_index = palette
                .iter()
                .position(|name| name == block.name())
                .unwrap_or(0);
            let position = Vec3::new(
                column as f32 * PILE_SPACING - center_offset,
                level as f32 + 0.5,
                0.0,
            );
            let node = scene
                .add_cube(CUBE_SIZE, CUBE_SIZE, CUBE_SIZE)
                .set_color(block_color(color_index))
                .set_position(position);
            nodes.push(node);
        }
    }
    nodes
}

/// Displays the configurations of a path in an interactive 3D viewer.
pub fn display(path: Vec<Configuration>) {
    pollster::block_on(display_async(path));
}

async fn display_async(path: Vec<Configuration>) {
    let Some(first) = path.first() else {
        println!("No configurations to display");
        return;
    };

    let step_count = path.len();
    let mut current_step = 0;
    let palette: Vec<String> = first
        .sorted_blocks()
        .iter()
        .map(|block| block.name().to_string())
        .collect();

    let title = |step: usize| {
        format!(
            "Step {}/{} - [Left/Right] step, [Home] first, [End] last",
            step,
            step_count - 1
        )
    };
    let mut window = Window::new(&title(0)).await;

    // frame the tallest tower the path ever builds
    let tallest = path
        .iter()
        .filter_map(|configuration| configuration.find_largest_pile())
        .map(Pile::len)
        .max()
        .unwrap_or(1);
    let mut camera = OrbitCamera3d::default();
    camera.set_dist(4.0 + tallest as f32 * 1.5);

    let mut scene = SceneNode3d::empty();
    scene
        .add_light(Light::point(100.0))
        .set_position(Vec3::new(5.0, 5.0, 5.0));

    let mut rendered = build_scene(&mut scene, &path[current_step], &palette);
    let mut needs_rebuild = false;

    loop {
        for event in window.events().iter() {
            if let kiss3d::event::WindowEvent::Key(key, action, _) = event.value {
                use kiss3d::event::{Action, Key};
                if action == Action::Press {
                    match key {
                        Key::Right if current_step + 1 < step_count => {
                            current_step += 1;
                            needs_rebuild = true;
                        }
                        Key::Left if current_step > 0 => {
                            current_step -= 1;
                            needs_rebuild = true;
                        }
                        Key::Home => {
                            current_step = 0;
                            needs_rebuild = true;
                        }
                        Key::End => {
                            current_step = step_count - 1;
                            needs_rebuild = true;
                        }
                        _ => {}
                    }
                }
            }
        }

        if needs_rebuild {
            for mut node in rendered.drain(..) {
                node.remove();
            }
            rendered = build_scene(&mut scene, &path[current_step], &palette);
            window.set_title(&title(current_step));
            needs_rebuild = false;
        }

        if !window.render_3d(&mut scene, &mut camera).await {
            break;
        }
    }
}
