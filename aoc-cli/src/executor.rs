//! Parallel executor for running solvers

use crate::cli::ParallelizeBy;
use crate::config::Config;
use crate::error::{ArcExecutorError, ExecutorError};
use crate::inputs::InputStore;
use aoc_solver::{DynSolver, SolverRegistry};
use chrono::TimeDelta;
use itertools::Itertools;
use rayon::prelude::*;
use std::ops::RangeInclusive;
use std::sync::mpsc::Sender;
use tracing::{debug, warn};

/// Result from a single solver execution
#[derive(Debug)]
pub struct SolverResult {
    pub year: u16,
    pub day: u8,
    pub part: u8,
    pub answer: Result<String, ArcExecutorError>,
    /// Parse time of the instance that solved this part, if parsing succeeded
    pub parse_duration: Option<TimeDelta>,
    pub solve_duration: TimeDelta,
}

impl SolverResult {
    fn failed(year: u16, day: u8, part: u8, error: ArcExecutorError) -> Self {
        Self {
            year,
            day,
            part,
            answer: Err(error),
            parse_duration: None,
            solve_duration: TimeDelta::zero(),
        }
    }
}

/// Work item representing a solver to execute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItem {
    pub year: u16,
    pub day: u8,
    pub parts: RangeInclusive<u8>,
}

/// State shared by every worker
struct RunContext {
    registry: SolverRegistry,
    inputs: InputStore,
    parallelize_by: ParallelizeBy,
    year_filter: Option<u16>,
    day_filter: Option<u8>,
    part_filter: Option<u8>,
}

/// Parallel executor for running solvers
pub struct Executor {
    ctx: RunContext,
    thread_pool: rayon::ThreadPool,
}

impl Executor {
    pub fn new(registry: SolverRegistry, config: &Config) -> Result<Self, ExecutorError> {
        let thread_pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.thread_count)
            .build()
            .map_err(|e| ExecutorError::ThreadPool(e.to_string()))?;

        Ok(Self {
            ctx: RunContext {
                registry,
                inputs: InputStore::new(config.input_dir.clone()),
                parallelize_by: config.parallelize_by,
                year_filter: config.year_filter,
                day_filter: config.day_filter,
                part_filter: config.part_filter,
            },
            thread_pool,
        })
    }

    pub fn inputs(&self) -> &InputStore {
        &self.ctx.inputs
    }

    /// Registered solvers that pass the year/day/part filters, in year/day order
    pub fn collect_work_items(&self) -> Vec<WorkItem> {
        let ctx = &self.ctx;
        ctx.registry
            .storage()
            .iter_info()
            .filter(|info| ctx.year_filter.is_none_or(|y| info.year == y))
            .filter(|info| ctx.day_filter.is_none_or(|d| info.day == d))
            .map(|info| WorkItem {
                year: info.year,
                day: info.day,
                parts: filter_parts(ctx.part_filter, info.parts),
            })
            .filter(|w| !w.parts.is_empty())
            .collect()
    }

    /// Execute all work items and send results to channel
    pub fn execute(&self, tx: Sender<SolverResult>) -> Result<(), ArcExecutorError> {
        let work_items = self.collect_work_items();
        debug!(
            items = work_items.len(),
            mode = ?self.ctx.parallelize_by,
            "starting execution"
        );

        match self.ctx.parallelize_by {
            ParallelizeBy::Sequential => run_group(work_items, &tx, &self.ctx),
            ParallelizeBy::Year => {
                let by_year: Vec<Vec<WorkItem>> = work_items
                    .into_iter()
                    .chunk_by(|w| w.year)
                    .into_iter()
                    .map(|(_, group)| group.collect())
                    .collect();
                self.execute_grouped(by_year, &tx)
            }
            ParallelizeBy::Day | ParallelizeBy::Part => {
                self.execute_grouped(work_items.into_iter().map(|w| vec![w]).collect(), &tx)
            }
        }
    }

    /// Run groups in parallel; items within a group run in order
    fn execute_grouped(
        &self,
        groups: Vec<Vec<WorkItem>>,
        tx: &Sender<SolverResult>,
    ) -> Result<(), ArcExecutorError> {
        let ctx = &self.ctx;
        self.thread_pool.install(|| {
            groups
                .into_par_iter()
                .map_with(tx.clone(), |tx, items| run_group(items, tx, ctx).err())
                .reduce(|| None, merge_errors)
                .map_or(Ok(()), Err)
        })
    }
}

/// Restrict `1..=max_parts` to the part filter; empty if the filter is out of range
#[allow(clippy::reversed_empty_ranges)]
fn filter_parts(part_filter: Option<u8>, max_parts: u8) -> RangeInclusive<u8> {
    match part_filter {
        Some(p) if p <= max_parts => p..=p,
        Some(_) => 1..=0,
        None => 1..=max_parts,
    }
}

fn merge_errors(
    a: Option<ArcExecutorError>,
    b: Option<ArcExecutorError>,
) -> Option<ArcExecutorError> {
    match (a, b) {
        (Some(a), Some(b)) => Some(ArcExecutorError::combine(a, b)),
        (a, b) => a.or(b),
    }
}

fn run_group(
    items: Vec<WorkItem>,
    tx: &Sender<SolverResult>,
    ctx: &RunContext,
) -> Result<(), ArcExecutorError> {
    items
        .iter()
        .map(|work| run_work_item(work, tx, ctx).err())
        .fold(None, merge_errors)
        .map_or(Ok(()), Err)
}

/// Solve every part of one work item.
///
/// Input and parse failures are reported as failed results for each part
/// rather than as errors; only a closed channel stops the run.
fn run_work_item(
    work: &WorkItem,
    tx: &Sender<SolverResult>,
    ctx: &RunContext,
) -> Result<(), ArcExecutorError> {
    let (year, day) = (work.year, work.day);
    let input = match ctx.inputs.read(year, day) {
        Ok(input) => input,
        Err(e) => {
            warn!(year, day, error = %e, "input unavailable");
            return send_failures(work, ExecutorError::from(e).into(), tx);
        }
    };

    if ctx.parallelize_by == ParallelizeBy::Part {
        // One instance per part, so parts do not share cached state
        return work
            .parts
            .clone()
            .into_par_iter()
            .map_with(tx.clone(), |tx, part| {
                let result = match ctx.registry.create_solver(year, day, &input) {
                    Ok(mut solver) => solve_part(year, day, part, &mut *solver),
                    Err(e) => SolverResult::failed(year, day, part, ExecutorError::from(e).into()),
                };
                send(tx, result).err()
            })
            .reduce(|| None, merge_errors)
            .map_or(Ok(()), Err);
    }

    let mut solver = match ctx.registry.create_solver(year, day, &input) {
        Ok(solver) => solver,
        Err(e) => {
            warn!(year, day, error = %e, "failed to parse input");
            return send_failures(work, ExecutorError::from(e).into(), tx);
        }
    };
    for part in work.parts.clone() {
        send(tx, solve_part(year, day, part, &mut *solver))?;
    }
    Ok(())
}

fn send_failures(
    work: &WorkItem,
    error: ArcExecutorError,
    tx: &Sender<SolverResult>,
) -> Result<(), ArcExecutorError> {
    for part in work.parts.clone() {
        send(tx, SolverResult::failed(work.year, work.day, part, error.clone()))?;
    }
    Ok(())
}

fn send(tx: &Sender<SolverResult>, result: SolverResult) -> Result<(), ArcExecutorError> {
    tx.send(result)
        .map_err(|_| ExecutorError::ChannelSend.into())
}

fn solve_part(year: u16, day: u8, part: u8, solver: &mut dyn DynSolver) -> SolverResult {
    let parse_duration = Some(solver.parse_duration());
    match solver.solve(part) {
        Ok(solved) => {
            debug!(year, day, part, micros = ?solved.duration().num_microseconds(), "solved");
            SolverResult {
                year,
                day,
                part,
                solve_duration: solved.duration(),
                answer: Ok(solved.answer),
                parse_duration,
            }
        }
        Err(e) => SolverResult {
            year,
            day,
            part,
            answer: Err(ExecutorError::from(aoc_solver::SolverError::from(e)).into()),
            parse_duration,
            solve_duration: TimeDelta::zero(),
        },
    }
}
