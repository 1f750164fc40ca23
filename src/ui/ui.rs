use flappy_evo::evolution::reporting::Statistics;
use egui_macroquad::egui;

pub struct UIState {
    pub show_stats: bool,
    /// Ticks simulated per paced interval.
    pub simulation_speed: u32,
    pub species_count: usize,
    pub best_fitness: Option<f32>,
    pub status_message: Option<String>,
}

impl UIState {
    pub fn new() -> Self {
        Self {
            show_stats: true,
            simulation_speed: 1,
            species_count: 0,
            best_fitness: None,
            status_message: None,
        }
    }
}

pub fn draw_ui(state: &mut UIState, stats: &Statistics) {
    egui_macroquad::ui(|egui_ctx| {
        let mut visuals = egui::Visuals::dark();
        visuals.override_text_color = Some(egui::Color32::from_rgb(240, 240, 240));
        visuals.widgets.noninteractive.fg_stroke.color = egui::Color32::from_rgb(220, 220, 220);
        egui_ctx.set_visuals(visuals);

        super::stats::draw_stats_window(egui_ctx, state, stats);
    });
}

pub fn process_egui() {
    egui_macroquad::draw();
}
