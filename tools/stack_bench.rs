// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Stack building throughput check on synthetic sequences.
//!
//! Builds color and depth stacks for a generated sequence with the configured
//! cache policy and fill strategy, then requests them again to show the cache
//! behaviour. Timings go to the log.

use std::collections::HashMap;
use std::env;
use std::path::PathBuf;
use std::process;
use std::time::Instant;

use ndarray::{Array2, Array3};
use posestack::config::{load_config, parse_cache_policy, validate_config, PoseStackConfig};
use posestack::observability::{debug_flags_help, init_logging, parse_debug_flags};
use posestack::prelude::*;

struct Args {
    config: Option<PathBuf>,
    frames: usize,
    height: usize,
    width: usize,
    joints: usize,
    overrides: HashMap<String, String>,
}

fn usage_and_exit() -> ! {
    eprintln!(
        "Usage: stack_bench [--config <path>] [--frames <n>] [--size <h>x<w>] [--joints <n>]\n\
         \x20                  [--cache-policy retain|discard] [--parallel] [--debug-<crate>]\n\n\
         Without --config, defaults are used (a posestack_configuration.toml is not required).\n\n{}",
        debug_flags_help()
    );
    process::exit(2);
}

fn parse_args() -> Args {
    let mut args = Args {
        config: None,
        frames: 256,
        height: 128,
        width: 128,
        joints: 21,
        overrides: HashMap::new(),
    };

    let mut iter = env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => {
                args.config = Some(PathBuf::from(iter.next().unwrap_or_else(|| usage_and_exit())));
            }
            "--frames" => args.frames = parse_number(iter.next()),
            "--joints" => args.joints = parse_number(iter.next()),
            "--size" => {
                let value = iter.next().unwrap_or_else(|| usage_and_exit());
                let (h, w) = value.split_once('x').unwrap_or_else(|| usage_and_exit());
                args.height = parse_number(Some(h.to_string()));
                args.width = parse_number(Some(w.to_string()));
            }
            "--cache-policy" => {
                let value = iter.next().unwrap_or_else(|| usage_and_exit());
                if parse_cache_policy(&value).is_none() {
                    eprintln!("Unknown cache policy: {value} (expected retain or discard)");
                    usage_and_exit();
                }
                args.overrides.insert("cache_policy".to_string(), value);
            }
            "--parallel" => {
                args.overrides.insert("parallel_build".to_string(), "true".to_string());
            }
            "-h" | "--help" => usage_and_exit(),
            other if other.starts_with("--debug-") => {}
            other => {
                eprintln!("Unknown argument: {other}");
                usage_and_exit();
            }
        }
    }
    args
}

fn parse_number(value: Option<String>) -> usize {
    value
        .and_then(|v| v.parse::<usize>().ok())
        .filter(|n| *n > 0)
        .unwrap_or_else(|| usage_and_exit())
}

fn synthetic_sequence(args: &Args) -> Sequence {
    let frames = (0..args.frames)
        .map(|i| {
            let color = Array3::from_shape_fn((args.height, args.width, 3), |(y, x, c)| {
                ((x + y * 3 + c * 7 + i) % 256) as f32
            });
            let dpt = Array2::from_shape_fn((args.height, args.width), |(y, x)| {
                if (x * y + i) % 17 == 0 {
                    0.0
                } else {
                    550.0 + ((x + y) % 100) as f32
                }
            });
            let gt3dcrop = Array2::from_shape_fn((args.joints, 3), |(j, d)| {
                ((j * 3 + d + i) % 200) as f32 - 100.0
            });
            let gtorig = gt3dcrop.mapv(|v| v + 600.0);
            Frame::new(color, dpt, gtorig, gt3dcrop, [64.0, 64.0, 600.0])
        })
        .collect::<StagingResult<Vec<Frame>>>()
        .unwrap_or_else(|e| {
            eprintln!("Failed to generate frames: {e}");
            process::exit(1);
        });
    let cube = Cube::new([250.0, 250.0, 250.0]).unwrap_or_else(|e| {
        eprintln!("{e}");
        process::exit(1);
    });
    Sequence::new("synthetic", frames, SequenceConfig::new(cube))
}

fn main() {
    let args = parse_args();

    let config = match &args.config {
        Some(path) => load_config(Some(path), Some(&args.overrides)),
        None => {
            let mut config = PoseStackConfig::default();
            posestack::config::apply_cli_overrides(&mut config, &args.overrides);
            Ok(config)
        }
    }
    .and_then(|config| validate_config(&config).map(|_| config))
    .unwrap_or_else(|e| {
        eprintln!("{e}");
        process::exit(2);
    });

    let _guard = init_logging(&parse_debug_flags(), &config.logging, None).unwrap_or_else(|e| {
        eprintln!("Failed to initialize logging: {e:#}");
        process::exit(1);
    });

    let sequence = synthetic_sequence(&args);
    let mut dataset = Dataset::from_config(Some(vec![sequence]), &config.staging);

    for modality in [StackModality::Color, StackModality::Depth] {
        for round in ["cold", "warm"] {
            let started = Instant::now();
            match dataset.default_stack("synthetic", modality) {
                Ok(Some(pair)) => tracing::info!(
                    "[STACK-BENCH] {} {} build: images {:?}, labels {:?} in {:?}",
                    round,
                    modality,
                    pair.images.shape(),
                    pair.labels.shape(),
                    started.elapsed()
                ),
                Ok(None) => tracing::error!("[STACK-BENCH] Sequence disappeared from dataset"),
                Err(e) => {
                    tracing::error!("[STACK-BENCH] {} build failed: {}", modality, e);
                    process::exit(1);
                }
            }
        }
    }

    let stats = dataset.cache_stats();
    tracing::info!(
        "[STACK-BENCH] Cache policy {:?}: {} hits, {} misses, {} image stacks held",
        dataset.cache_policy(),
        stats.hits,
        stats.misses,
        stats.image_entries
    );
}
