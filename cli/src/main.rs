use anyhow::Context;
use clap::Parser;
use gui::core::gui::GraphPlot;
use plotters::prelude::*;
use raceplay::core::handle_playback::handle_playback;
use raceplay::core::narration::Transcript;
use raceplay::core::race_dataset::RaceDataset;
use raceplay::core::renderer::{Palette, SceneRecorder};
use raceplay::interfaces::gui_interface::GuiLink;
use raceplay::post::playback_result::{PlaybackResult, ResourceSample};
use raceplay::post::race_overview::{format_race_strategy, format_track_overview};
use raceplay::pre::play_opts::PlayOpts;
use raceplay::pre::read_race_data::read_race_data;
use std::thread;
use std::time::Instant;

/// export_resource_plot draws fuel (top) and tyre distance (bottom) of every played car over its
/// steps and saves the chart as PNG in output/.
fn export_resource_plot(
    result: &PlaybackResult,
    dataset: &RaceDataset,
    palette: &Palette,
) -> anyhow::Result<String> {
    let out_dir = std::path::Path::new("output");
    std::fs::create_dir_all(out_dir)?;
    let ts = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)?
        .as_secs();
    let out_path = out_dir.join(format!("resource_plot_{}.png", ts));

    let max_step = result
        .samples
        .iter()
        .map(|sample| sample.step)
        .max()
        .unwrap_or(0);

    let root = BitMapBackend::new(&out_path, (1280, 900)).into_drawing_area();
    root.fill(&WHITE)?;
    let areas = root.split_evenly((2, 1));

    let panels: [(&str, fn(&ResourceSample) -> f64); 2] = [
        ("Fuel", |sample: &ResourceSample| sample.fuel),
        ("Tyre distance", |sample: &ResourceSample| sample.tyre_distance),
    ];

    for (area, (caption, get_value)) in areas.iter().zip(panels.iter()) {
        let values: Vec<f64> = result.samples.iter().map(|sample| get_value(sample)).collect();
        let mut y_min = values.iter().cloned().fold(f64::INFINITY, f64::min).min(0.0);
        let mut y_max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        if !y_max.is_finite() || y_max <= y_min {
            y_max = y_min + 1.0;
        }
        let margin = (y_max - y_min) * 0.05;
        y_min -= margin;
        y_max += margin;

        let mut chart = ChartBuilder::on(area)
            .caption(*caption, ("sans-serif", 24).into_font())
            .margin(20)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(0f64..(max_step as f64 + 1.0), y_min..y_max)?;

        chart
            .configure_mesh()
            .x_desc("Step")
            .y_desc(*caption)
            .label_style(("sans-serif", 16))
            .axis_desc_style(("sans-serif", 16))
            .draw()?;

        for (i, car) in dataset.fleet().iter().enumerate() {
            let series: Vec<(f64, f64)> = result
                .samples_for_car(car.car_no)
                .into_iter()
                .map(|sample| (sample.step as f64, get_value(sample)))
                .collect();
            if series.is_empty() {
                continue;
            }

            let car_color = palette.car_color(i);
            let color = RGBColor(car_color.r, car_color.g, car_color.b);
            chart
                .draw_series(LineSeries::new(series.into_iter(), color.stroke_width(2)))?
                .label(format!("Car {}", car.car_no))
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
        }

        chart
            .configure_series_labels()
            .border_style(&BLACK)
            .background_style(&WHITE.mix(0.8))
            .label_font(("sans-serif", 16))
            .position(plotters::chart::SeriesLabelPosition::UpperRight)
            .draw()?;
    }

    root.present()?;
    Ok(out_path.to_string_lossy().into_owned())
}

fn write_outputs(result: &PlaybackResult, play_opts: &PlayOpts) {
    match result.write_transcript_to_file(play_opts.transcript_path.as_deref()) {
        Ok(path) => println!("INFO: Transcript written to {}", path),
        Err(e) => eprintln!("WARNING: Could not write transcript: {}", e),
    }
    match result.write_samples_csv(None) {
        Ok(path) => println!("INFO: Resource trace written to {}", path),
        Err(e) => eprintln!("WARNING: Could not write resource trace: {}", e),
    }
}

fn main() -> anyhow::Result<()> {
    // PRE-PROCESSING ------------------------------------------------------------------------------
    // get playback options from the command line arguments
    let play_opts: PlayOpts = PlayOpts::parse();
    let config = play_opts.playback_config()?;

    // get race data
    let dataset = if let Some(datafile_path) = &play_opts.datafile_path {
        println!("INFO: Reading race data from {:?}", datafile_path);
        match read_race_data(datafile_path) {
            Ok(dataset) => dataset,
            Err(e) => {
                eprintln!("ERROR: {}", e);
                anyhow::bail!("Could not start the playback!");
            }
        }
    } else {
        anyhow::bail!("No race data file provided! Use -p <path_to_json> to run the playback.");
    };

    // print race details
    println!(
        "INFO: Replaying {} cars on a track with {} nodes, step interval {}ms, car delay {}ms",
        dataset.fleet().len(),
        dataset.graph().node_count,
        config.step_interval.as_millis(),
        config.car_delay.as_millis()
    );

    // EXECUTION -----------------------------------------------------------------------------------
    if !play_opts.gui {
        // NON-GUI CASE
        print!("{}", format_track_overview(&dataset)?);
        for (car, path) in dataset.fleet().iter().zip(dataset.path_results().iter()) {
            print!(
                "{}",
                format_race_strategy(car, path.as_ref(), dataset.graph())?
            );
        }

        println!("INFO: Running playback without GUI...");
        let t_start = Instant::now();

        let result = handle_playback(
            &dataset,
            &config,
            SceneRecorder::default(),
            Transcript::new(true),
            play_opts.realtime_factor_opt(),
        )?;

        println!("INFO: Execution time: {}ms", t_start.elapsed().as_millis());

        // POST-PROCESSING -------------------------------------------------------------------------
        result.print_outcomes();
        write_outputs(&result, &play_opts);

        match export_resource_plot(&result, &dataset, &Palette::new()?) {
            Ok(path) => println!("INFO: Resource plot written to {}", path),
            Err(e) => eprintln!("WARNING: Could not write resource plot: {}", e),
        }
    } else {
        // GUI CASE
        println!("INFO: Starting playback with GUI...");

        // create channels for the playback states and the layout state
        let (tx, rx) = flume::unbounded();
        let (stabilized_tx, stabilized_rx) = flume::unbounded();

        // execute playback in a separate thread, the GUI must run in the main thread
        let dataset_thread = dataset.clone();
        let play_opts_thread = play_opts.clone();
        let gui_link = GuiLink::new(tx, stabilized_rx);

        let _ = thread::spawn(move || {
            let result = handle_playback(
                &dataset_thread,
                &config,
                gui_link.clone(),
                gui_link,
                play_opts_thread.realtime_factor_opt(),
            )
            .context("Playback stopped!");

            match result {
                Ok(result) => write_outputs(&result, &play_opts_thread),
                Err(e) => eprintln!("ERROR: {:?}", e),
            }
        });

        let gui = GraphPlot::new(rx, stabilized_tx);
        let native_options = eframe::NativeOptions {
            initial_window_size: Some(eframe::egui::Vec2::new(1280.0, 720.0)),
            ..eframe::NativeOptions::default()
        };
        eframe::run_native(Box::new(gui), native_options);
    }

    Ok(())
}
