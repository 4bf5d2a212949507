use bevy::prelude::*;
use clap::Parser;
use walkabout::{SceneConfig, WalkaboutGame};
/*

Arrow keys walk the character around, releasing them settles it back into its idle clip.
Left drag orbits the camera, the wheel zooms. Escape quits.

Assets are read from ./assets by default: oldman.glb (needs "idle" and "walking" clips)
and Material_diffuse.jpeg as the backdrop. Run with --help for the other settings.

*/
fn main() -> AppExit {
    let config = SceneConfig::parse();
    let mut app = App::new();
    app.add_plugins(WalkaboutGame::new(config));
    #[cfg(feature = "inspector")]
    app.add_plugins(bevy_inspector_egui::quick::WorldInspectorPlugin::new());
    app.run()
}
