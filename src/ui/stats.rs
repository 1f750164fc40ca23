use egui_macroquad::egui;
use egui_plot::{Legend, Line, Plot, PlotPoints};
use flappy_evo::evolution::reporting::Statistics;

use super::ui::UIState;

pub(super) fn draw_stats_window(egui_ctx: &egui::Context, state: &mut UIState, stats: &Statistics) {
    egui::Window::new("Evolution Stats")
        .default_open(false)
        .default_width(300.0)
        .anchor(egui::Align2::RIGHT_TOP, [-10.0, 60.0])
        .open(&mut state.show_stats)
        .show(egui_ctx, |ui| {
            ui.label("Simulation Speed");
            ui.add(egui::Slider::new(&mut state.simulation_speed, 1..=20).text("ticks/step"));

            if let Some(ref msg) = state.status_message {
                ui.label(msg);
            }

            ui.separator();

            ui.label(format!("Species: {}", state.species_count));
            if let Some(best) = state.best_fitness {
                ui.label(format!("Best fitness: {best:.1}"));
            }
            if let Some(latest) = stats.latest() {
                ui.label(format!(
                    "Generation {}: best {:.1}, mean {:.1} ± {:.1}",
                    latest.generation,
                    latest.best_fitness,
                    latest.mean_fitness,
                    latest.stdev_fitness
                ));
            }

            ui.separator();
            ui.heading("Fitness Per Generation");
            draw_fitness_plot(ui, stats);
        });
}

fn draw_fitness_plot(ui: &mut egui::Ui, stats: &Statistics) {
    if stats.generations.is_empty() {
        ui.label("Collecting data...");
        return;
    }

    let best: PlotPoints = stats
        .generations
        .iter()
        .map(|g| [g.generation as f64, g.best_fitness as f64])
        .collect();
    let mean: PlotPoints = stats
        .generations
        .iter()
        .map(|g| [g.generation as f64, g.mean_fitness as f64])
        .collect();

    Plot::new("fitness_plot")
        .height(150.0)
        .show_axes([true, true])
        .legend(Legend::default())
        .label_formatter(|name, value| {
            format!("{}\nGeneration: {:.0}\nFitness: {:.1}", name, value.x, value.y)
        })
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new(best)
                    .color(egui::Color32::from_rgb(255, 200, 60))
                    .name("Best"),
            );
            plot_ui.line(
                Line::new(mean)
                    .color(egui::Color32::from_rgb(100, 150, 255))
                    .name("Mean"),
            );
        });
}
