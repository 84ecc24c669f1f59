//! End-to-end job test against a scripted in-memory device.
//!
//! The responder plays the controller board: it records every
//! CR-terminated command and answers `OK`, so the full wire sequence of a
//! job can be asserted without hardware.

use plot_core::command::Dialect;
use plot_driver_ebb::{EbbClient, EbbConfig, MotionPlanner, PenActuator};
use plot_engine::{PlotOptions, PlotOrchestrator};
use plot_svg::extract_job;
use std::time::Duration;
use tokio::io::{AsyncWriteExt, BufReader};
use tokio::sync::mpsc;

fn spawn_ok_responder(host: tokio::io::DuplexStream) -> mpsc::UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();
    tokio::spawn(async move {
        let (read_half, mut write_half) = tokio::io::split(host);
        let mut reader = BufReader::new(read_half);
        loop {
            let mut buf = Vec::new();
            match tokio::io::AsyncBufReadExt::read_until(&mut reader, b'\r', &mut buf).await {
                Ok(0) | Err(_) => break,
                Ok(_) => {
                    let cmd = String::from_utf8_lossy(&buf)
                        .trim_end_matches('\r')
                        .to_string();
                    if tx.send(cmd).is_err() {
                        break;
                    }
                    if write_half.write_all(b"OK\r\n").await.is_err() {
                        break;
                    }
                }
            }
        }
    });
    rx
}

fn orchestrator(device: tokio::io::DuplexStream) -> PlotOrchestrator {
    let client = EbbClient::with_handle(Box::new(device), Dialect::default(), Duration::from_secs(1));
    let config = EbbConfig::default();
    let motion = MotionPlanner::new(client.clone(), &config);
    let pen = PenActuator::new(client, &config);
    PlotOrchestrator::new(motion, pen, PlotOptions::default()).unwrap()
}

fn drain(rx: &mut mpsc::UnboundedReceiver<String>) -> Vec<String> {
    let mut commands = Vec::new();
    while let Ok(cmd) = rx.try_recv() {
        commands.push(cmd);
    }
    commands
}

#[tokio::test(start_paused = true)]
async fn single_path_job_emits_the_full_command_sequence() {
    let (host, device) = tokio::io::duplex(1024);
    let mut rx = spawn_ok_responder(host);
    let mut orchestrator = orchestrator(device);

    // One horizontal stroke near the top of a 200x150 canvas. With Y
    // inversion it lands at plotter y = 10.
    let svg = r#"<svg viewBox="0 0 200 150"><path d="M 10 140 L 30 140"/></svg>"#;
    let job = extract_job(svg, None).unwrap();

    let summary = orchestrator.run(&job).await.unwrap();
    assert_eq!(summary.paths_total, 1);
    assert_eq!(summary.paths_failed, 0);
    assert_eq!(summary.segments_drawn, 1);

    let commands = drain(&mut rx);
    assert_eq!(
        commands,
        vec![
            "EM,1,1",            // enable drivers
            "HM,5000",           // home
            "SP,750",            // pen up before travel
            "SM,100,1600,0",     // travel to (10,10) at 2x speed
            "SP,250",            // pen down
            "SM,400,1600,1600",  // draw to (30,10) at drawing speed
            "SP,750",            // pen up after the path
            "SP,750",            // pen up again during cleanup
            "SM,300,-3200,-1600",// return to origin at 2x speed
            "EM,0,0",            // release drivers
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn failed_path_is_skipped_and_the_job_continues() {
    let (host, device) = tokio::io::duplex(1024);
    let mut rx = spawn_ok_responder(host);
    let mut orchestrator = orchestrator(device);

    // The first path starts so far out that its steps overflow the 32-bit
    // command range; the kinematics gate rejects the travel move before
    // anything reaches the wire. The second path is ordinary.
    let svg = r#"<svg viewBox="0 0 200 150">
        <path d="M 60000000 0 L 60000001 0"/>
        <path d="M 10 140 L 30 140"/>
    </svg>"#;
    let job = extract_job(svg, None).unwrap();

    let summary = orchestrator.run(&job).await.unwrap();
    assert_eq!(summary.paths_total, 2);
    assert_eq!(summary.paths_failed, 1);
    assert_eq!(summary.segments_drawn, 1);

    let commands = drain(&mut rx);
    // The bad path contributed only its pen-up; no move command for it
    // ever hit the wire.
    assert_eq!(
        commands,
        vec![
            "EM,1,1",
            "HM,5000",
            "SP,750",            // pen up for the doomed path
            "SP,750",            // pen up for the good path
            "SM,100,1600,0",
            "SP,250",
            "SM,400,1600,1600",
            "SP,750",
            "SP,750",
            "SM,300,-3200,-1600",
            "EM,0,0",
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn job_without_canvas_height_skips_y_inversion() {
    let (host, device) = tokio::io::duplex(1024);
    let mut rx = spawn_ok_responder(host);
    let mut orchestrator = orchestrator(device);

    let svg = r#"<svg><path d="M 10 10 L 30 10"/></svg>"#;
    let job = extract_job(svg, None).unwrap();
    assert_eq!(job.canvas_height(), None);

    orchestrator.run(&job).await.unwrap();

    let commands = drain(&mut rx);
    // Travel goes to uninverted (10, 10): dx and dy both 10 mm.
    assert!(commands.contains(&"SM,100,1600,0".to_string()));
}
