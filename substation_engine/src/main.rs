// /////////////////////////////////////////////////////////////////////////////
// Substation
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Composition root: parses CLI arguments, loads a pipeline document, and
//! either validates it or runs it end to end against file-based input and
//! output, with graceful shutdown on Ctrl-C.

use std::io::Write as _;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use substation_bootstrap::cli::{self, ValidatedCommand};
use substation_bootstrap::shutdown::ShutdownCoordinator;
use substation_engine::infrastructure::config::load_pipeline_document;
use substation_engine::infrastructure::metrics::MetricsService;
use substation_engine::infrastructure::runtime::pipeline::Pipeline;
use substation_engine::infrastructure::runtime::transform::TransformStage;
use substation_engine::{Capsule, MetricsPort, SubstationError};
use tokio::sync::mpsc;

#[tokio::main]
async fn main() -> ExitCode {
    let validated = match cli::parse_and_validate() {
        Ok(cli) => cli,
        Err(err) => {
            eprintln!("substation: {err}");
            return ExitCode::FAILURE;
        }
    };

    substation_engine::infrastructure::logging::init(validated.verbose);

    let result = match validated.command {
        ValidatedCommand::Validate { pipeline } => run_validate(&pipeline),
        ValidatedCommand::Run {
            pipeline,
            input,
            output,
            grace_period_secs,
        } => run_pipeline(&pipeline, &input, &output, grace_period_secs, validated.channel_depth).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "substation run failed");
            ExitCode::FAILURE
        }
    }
}

fn run_validate(pipeline_path: &std::path::Path) -> Result<(), SubstationError> {
    let document = load_pipeline_document(pipeline_path)?;
    let pipeline = Pipeline::from_document(&document)?;
    println!("pipeline {:?} is valid", pipeline.name());
    Ok(())
}

async fn run_pipeline(
    pipeline_path: &std::path::Path,
    input_path: &std::path::Path,
    output_path: &std::path::Path,
    grace_period_secs: u64,
    channel_depth: usize,
) -> Result<(), SubstationError> {
    let document = load_pipeline_document(pipeline_path)?;
    let pipeline = Arc::new(Pipeline::from_document(&document)?);
    tracing::info!(pipeline = pipeline.name(), "loaded pipeline");

    let metrics: Arc<dyn MetricsPort> = Arc::new(MetricsService::new()?);
    let coordinator = ShutdownCoordinator::new(Duration::from_secs(grace_period_secs));

    let shutdown_signal = coordinator.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("received Ctrl-C, initiating graceful shutdown");
            shutdown_signal.initiate_shutdown();
        }
    });

    let (in_tx, in_rx) = mpsc::channel::<Capsule>(channel_depth);
    let (out_tx, out_rx) = mpsc::channel::<Capsule>(channel_depth);

    let stage = Arc::new(TransformStage::new(pipeline.clone(), metrics));
    let transform_handle = {
        let stage = stage.clone();
        let coordinator = coordinator.clone();
        tokio::spawn(async move { stage.run(in_rx, out_tx, coordinator.token()).await })
    };

    let input_path = input_path.to_path_buf();
    let producer = tokio::task::spawn_blocking(move || -> Result<(), SubstationError> {
        let contents = std::fs::read_to_string(&input_path)?;
        for line in contents.lines().filter(|l| !l.is_empty()) {
            if in_tx.blocking_send(Capsule::new(line.as_bytes().to_vec())).is_err() {
                break;
            }
        }
        Ok(())
    });

    let output_path = output_path.to_path_buf();
    let consumer = tokio::task::spawn_blocking(move || -> Result<usize, SubstationError> {
        let mut file = std::fs::File::create(&output_path)?;
        let mut written = 0usize;
        let mut out_rx = out_rx;
        while let Some(capsule) = out_rx.blocking_recv() {
            file.write_all(capsule.data())?;
            file.write_all(b"\n")?;
            written += 1;
        }
        Ok(written)
    });

    producer
        .await
        .map_err(|e| SubstationError::Internal(format!("input reader task panicked: {e}")))??;

    let transform_result = transform_handle
        .await
        .map_err(|e| SubstationError::Internal(format!("transform stage task panicked: {e}")))?;

    let written = consumer
        .await
        .map_err(|e| SubstationError::Internal(format!("output writer task panicked: {e}")))??;
    tracing::info!(capsules_written = written, "run complete");

    coordinator.complete_shutdown();

    match transform_result {
        Ok(()) => Ok(()),
        Err(SubstationError::Cancelled(_)) => Ok(()),
        Err(err) => Err(err),
    }
}
