use std::collections::HashMap;
use std::fmt::Write as _;

use serde::Serialize;
use statrs::distribution::{ContinuousCDF, Normal};
use thiserror::Error;

use crate::config::{AgentConfig, TournamentConfig};
use crate::tournament::{DecisionSummary, GameOutcome};

const CONFIDENCE_Z: f64 = 1.96; // 95% CI

#[derive(Debug, Error)]
pub enum AnalyticsError {
    #[error("baseline agent '{0}' not present in tournament results")]
    MissingBaseline(String),
    #[error("agent '{0}' defined in results but missing from configuration")]
    UnknownAgent(String),
    #[error("failed to serialise summary: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Accumulates per-agent results across games.
pub struct AnalyticsCollector {
    baseline: String,
    agents: HashMap<String, AgentAccumulator>,
    agent_order: Vec<String>,
    games: usize,
}

impl AnalyticsCollector {
    pub fn new(config: &TournamentConfig) -> Result<Self, AnalyticsError> {
        let baseline = config
            .metrics
            .baseline
            .clone()
            .ok_or_else(|| AnalyticsError::MissingBaseline("<unset>".into()))?;

        let mut agents = HashMap::new();
        let mut order = Vec::new();
        for agent in &config.agents {
            agents.insert(agent.name.clone(), AgentAccumulator::new(agent));
            order.push(agent.name.clone());
        }
        if !agents.contains_key(&baseline) {
            return Err(AnalyticsError::MissingBaseline(baseline));
        }

        Ok(Self {
            baseline,
            agents,
            agent_order: order,
            games: 0,
        })
    }

    pub fn record_game(&mut self, outcome: &GameOutcome) -> Result<(), AnalyticsError> {
        if !outcome
            .seats
            .iter()
            .any(|seat| seat.agent_name == self.baseline)
        {
            return Err(AnalyticsError::MissingBaseline(self.baseline.clone()));
        }

        for seat in &outcome.seats {
            let acc = self
                .agents
                .get_mut(&seat.agent_name)
                .ok_or_else(|| AnalyticsError::UnknownAgent(seat.agent_name.clone()))?;
            acc.record_game(GameLine {
                coins: f64::from(seat.coins),
                won: seat.won,
                belief_accuracy: seat.belief_accuracy,
                belief_failures: seat.belief_failures,
                illegal_decisions: seat.illegal_decisions,
                metrics: &seat.metrics,
            });
        }
        self.games += 1;
        Ok(())
    }

    pub fn finalize(mut self) -> Result<AnalyticsSummary, AnalyticsError> {
        let mut reports = Vec::new();
        for name in &self.agent_order {
            if let Some(acc) = self.agents.remove(name) {
                reports.push(acc.into_report());
            }
        }

        let baseline = reports
            .iter()
            .find(|report| report.name == self.baseline)
            .map(|report| (report.wins, report.games))
            .ok_or_else(|| AnalyticsError::MissingBaseline(self.baseline.clone()))?;

        let comparisons = reports
            .iter()
            .map(|report| {
                let p_value = if report.name == self.baseline {
                    1.0
                } else {
                    two_proportion_p_value((report.wins, report.games), baseline)
                };
                ComparisonReport {
                    agent: report.name.clone(),
                    p_value,
                    sample_size: report.games,
                }
            })
            .collect();

        Ok(AnalyticsSummary {
            baseline: self.baseline,
            games: self.games,
            agents: reports,
            comparisons,
        }
        .enrich())
    }
}

struct GameLine<'a> {
    coins: f64,
    won: bool,
    belief_accuracy: f64,
    belief_failures: u32,
    illegal_decisions: u32,
    metrics: &'a DecisionSummary,
}

struct AgentAccumulator {
    name: String,
    kind: String,
    games: u32,
    wins: u32,
    per_game_coins: Vec<f64>,
    total_accuracy: f64,
    belief_failures: u64,
    illegal_decisions: u64,
    total_latency_ms: f64,
    total_decisions: u64,
}

impl AgentAccumulator {
    fn new(config: &AgentConfig) -> Self {
        Self {
            name: config.name.clone(),
            kind: config.kind.clone(),
            games: 0,
            wins: 0,
            per_game_coins: Vec::new(),
            total_accuracy: 0.0,
            belief_failures: 0,
            illegal_decisions: 0,
            total_latency_ms: 0.0,
            total_decisions: 0,
        }
    }

    fn record_game(&mut self, line: GameLine<'_>) {
        self.games += 1;
        if line.won {
            self.wins += 1;
        }
        self.per_game_coins.push(line.coins);
        self.total_accuracy += line.belief_accuracy;
        self.belief_failures += u64::from(line.belief_failures);
        self.illegal_decisions += u64::from(line.illegal_decisions);
        self.total_latency_ms += line.metrics.total_ms;
        self.total_decisions += u64::from(line.metrics.decisions);
    }

    fn into_report(self) -> AgentReport {
        let games = f64::from(self.games);
        let per_game = |total: f64| if self.games == 0 { 0.0 } else { total / games };

        let avg_latency = if self.total_decisions == 0 {
            0.0
        } else {
            self.total_latency_ms / self.total_decisions as f64
        };

        AgentReport {
            name: self.name,
            kind: self.kind,
            games: self.games as usize,
            wins: self.wins as usize,
            win_rate: per_game(f64::from(self.wins)),
            avg_coins: per_game(self.per_game_coins.iter().sum()),
            ci95: confidence_interval(&self.per_game_coins),
            avg_belief_accuracy: per_game(self.total_accuracy),
            belief_failures: self.belief_failures,
            illegal_decisions: self.illegal_decisions,
            average_ms_per_decision: avg_latency,
            delta_vs_baseline: 0.0,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsSummary {
    pub baseline: String,
    pub games: usize,
    pub agents: Vec<AgentReport>,
    pub comparisons: Vec<ComparisonReport>,
}

impl AnalyticsSummary {
    fn enrich(mut self) -> Self {
        let baseline_rate = self
            .agent(&self.baseline)
            .map(|agent| agent.win_rate)
            .unwrap_or(0.0);

        for agent in &mut self.agents {
            agent.delta_vs_baseline = agent.win_rate - baseline_rate;
        }

        self
    }

    pub fn agent(&self, name: &str) -> Option<&AgentReport> {
        self.agents.iter().find(|agent| agent.name == name)
    }

    pub fn to_json(&self) -> Result<String, AnalyticsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn to_markdown(&self) -> String {
        let mut rows = String::new();
        rows.push_str("# Tournament Summary\n\n");
        let _ = writeln!(
            rows,
            "Games: {} | Baseline: {}\n",
            self.games, self.baseline
        );
        rows.push_str("| Agent | Kind | Games | Win % | Δ vs baseline | Avg coins | 95% CI | Belief acc. | Belief failures | Illegal | Avg ms/decision | p-value |\n");
        rows.push_str("|-------|------|-------|-------|----------------|-----------|--------|-------------|-----------------|---------|------------------|---------|\n");

        for agent in &self.agents {
            let p_value = self
                .comparisons
                .iter()
                .find(|c| c.agent == agent.name)
                .map(|c| c.p_value)
                .unwrap_or(1.0);

            let _ = writeln!(
                rows,
                "| {name} | {kind} | {games} | {win:.1}% | {delta:+.1}% | {coins:.2} | [{ci_low:.2}, {ci_high:.2}] | {acc:.3} | {failures} | {illegal} | {latency:.3} | {pval:.3} |",
                name = agent.name,
                kind = agent.kind,
                games = agent.games,
                win = agent.win_rate * 100.0,
                delta = agent.delta_vs_baseline * 100.0,
                coins = agent.avg_coins,
                ci_low = agent.ci95.0,
                ci_high = agent.ci95.1,
                acc = agent.avg_belief_accuracy,
                failures = agent.belief_failures,
                illegal = agent.illegal_decisions,
                latency = agent.average_ms_per_decision,
                pval = p_value,
            );
        }

        rows
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AgentReport {
    pub name: String,
    pub kind: String,
    pub games: usize,
    pub wins: usize,
    pub win_rate: f64,
    pub avg_coins: f64,
    /// 95% confidence interval of final coins.
    pub ci95: (f64, f64),
    pub avg_belief_accuracy: f64,
    pub belief_failures: u64,
    pub illegal_decisions: u64,
    pub average_ms_per_decision: f64,
    #[serde(skip)]
    pub delta_vs_baseline: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ComparisonReport {
    pub agent: String,
    pub p_value: f64,
    pub sample_size: usize,
}

/// Two-sided pooled z-test on win rates; `(wins, games)` per side.
fn two_proportion_p_value(agent: (usize, usize), baseline: (usize, usize)) -> f64 {
    let (wins_a, n_a) = agent;
    let (wins_b, n_b) = baseline;
    if n_a == 0 || n_b == 0 {
        return 1.0;
    }
    let (n_a, n_b) = (n_a as f64, n_b as f64);
    let rate_a = wins_a as f64 / n_a;
    let rate_b = wins_b as f64 / n_b;
    let pooled = (wins_a + wins_b) as f64 / (n_a + n_b);
    let se = (pooled * (1.0 - pooled) * (1.0 / n_a + 1.0 / n_b)).sqrt();
    if se <= f64::EPSILON {
        return 1.0;
    }

    let z = (rate_a - rate_b).abs() / se;
    let Ok(normal) = Normal::new(0.0, 1.0) else {
        return 1.0;
    };
    (2.0 * (1.0 - normal.cdf(z))).clamp(0.0, 1.0)
}

fn confidence_interval(points: &[f64]) -> (f64, f64) {
    if points.is_empty() {
        return (0.0, 0.0);
    }
    let mean = points.iter().sum::<f64>() / points.len() as f64;
    if points.len() == 1 {
        return (mean, mean);
    }
    let variance = points
        .iter()
        .map(|value| (value - mean).powi(2))
        .sum::<f64>()
        / (points.len() as f64 - 1.0);
    let std_error = (variance / points.len() as f64).sqrt();
    let margin = CONFIDENCE_Z * std_error;
    (mean - margin, mean + margin)
}
