//! Order specifications and discrete trading trajectories.

use serde::Serialize;

use crate::error::{check_finite, check_positive, ExecutionError};

const TRADE_TOLERANCE: f64 = 1e-8;

/// Holdings to liquidate over a horizon split into equal intervals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OrderSpecification {
    start_holdings: f64,
    horizon: f64,
    num_intervals: usize,
}

impl OrderSpecification {
    /// Creates the specification.
    ///
    /// # Errors
    /// `InvalidOrder` for zero intervals, `InvalidParameter` for a non-finite
    /// size or non-positive horizon.
    pub fn new(
        start_holdings: f64,
        horizon: f64,
        num_intervals: usize,
    ) -> Result<Self, ExecutionError> {
        check_finite("start_holdings", start_holdings)?;
        check_positive("horizon", horizon)?;
        if num_intervals == 0 {
            return Err(ExecutionError::InvalidOrder(
                "at least one trading interval required".to_string(),
            ));
        }
        Ok(Self {
            start_holdings,
            horizon,
            num_intervals,
        })
    }

    /// X.
    #[inline]
    pub fn start_holdings(&self) -> f64 {
        self.start_holdings
    }

    /// T.
    #[inline]
    pub fn horizon(&self) -> f64 {
        self.horizon
    }

    /// N.
    #[inline]
    pub fn num_intervals(&self) -> usize {
        self.num_intervals
    }

    /// Interval length τ = T / N.
    #[inline]
    pub fn tau(&self) -> f64 {
        self.horizon / self.num_intervals as f64
    }

    /// The N + 1 nodes `0, τ, ..., T`.
    pub fn time_nodes(&self) -> Vec<f64> {
        let tau = self.tau();
        (0..=self.num_intervals)
            .map(|i| {
                if i == self.num_intervals {
                    self.horizon
                } else {
                    i as f64 * tau
                }
            })
            .collect()
    }
}

/// Holdings and trades at discrete time nodes.
///
/// `trade_list[i] = holdings[i + 1] - holdings[i]`, so a sell program has
/// negative trades.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradingTrajectory {
    time_nodes: Vec<f64>,
    holdings: Vec<f64>,
    trade_list: Vec<f64>,
}

impl TradingTrajectory {
    /// Creates a trajectory from all three arrays.
    ///
    /// # Errors
    /// `InvalidTrajectory` when lengths disagree, nodes are not strictly
    /// increasing, values are non-finite or trades do not match holdings.
    pub fn new(
        time_nodes: Vec<f64>,
        holdings: Vec<f64>,
        trade_list: Vec<f64>,
    ) -> Result<Self, ExecutionError> {
        if time_nodes.len() < 2 {
            return Err(ExecutionError::InvalidTrajectory(
                "at least two time nodes required".to_string(),
            ));
        }
        if holdings.len() != time_nodes.len() || trade_list.len() + 1 != time_nodes.len() {
            return Err(ExecutionError::InvalidTrajectory(format!(
                "{} nodes, {} holdings, {} trades",
                time_nodes.len(),
                holdings.len(),
                trade_list.len()
            )));
        }
        if time_nodes
            .iter()
            .chain(&holdings)
            .chain(&trade_list)
            .any(|v| !v.is_finite())
        {
            return Err(ExecutionError::InvalidTrajectory(
                "non-finite entry".to_string(),
            ));
        }
        if time_nodes.windows(2).any(|w| w[1] <= w[0]) {
            return Err(ExecutionError::InvalidTrajectory(
                "time nodes must be strictly increasing".to_string(),
            ));
        }
        let scale = holdings.iter().fold(1.0_f64, |m, h| m.max(h.abs()));
        for (i, (w, trade)) in holdings.windows(2).zip(&trade_list).enumerate() {
            if ((w[1] - w[0]) - trade).abs() > TRADE_TOLERANCE * scale {
                return Err(ExecutionError::InvalidTrajectory(format!(
                    "trade {i} does not match holdings change"
                )));
            }
        }
        Ok(Self {
            time_nodes,
            holdings,
            trade_list,
        })
    }

    /// Creates a trajectory, deriving trades from holdings.
    pub fn from_holdings(
        time_nodes: Vec<f64>,
        holdings: Vec<f64>,
    ) -> Result<Self, ExecutionError> {
        let trade_list = holdings.windows(2).map(|w| w[1] - w[0]).collect();
        Self::new(time_nodes, holdings, trade_list)
    }

    /// Uniform-rate (TWAP) liquidation of an order.
    pub fn linear(order: &OrderSpecification) -> Result<Self, ExecutionError> {
        let x = order.start_holdings();
        let n = order.num_intervals() as f64;
        let holdings = (0..=order.num_intervals())
            .map(|i| x * (1.0 - i as f64 / n))
            .collect();
        Self::from_holdings(order.time_nodes(), holdings)
    }

    /// Node times.
    #[inline]
    pub fn time_nodes(&self) -> &[f64] {
        &self.time_nodes
    }

    /// Holdings at each node.
    #[inline]
    pub fn holdings(&self) -> &[f64] {
        &self.holdings
    }

    /// Holdings change over each interval.
    #[inline]
    pub fn trade_list(&self) -> &[f64] {
        &self.trade_list
    }

    /// Number of trading intervals.
    #[inline]
    pub fn num_intervals(&self) -> usize {
        self.trade_list.len()
    }

    /// Interval lengths.
    pub fn interval_lengths(&self) -> Vec<f64> {
        self.time_nodes.windows(2).map(|w| w[1] - w[0]).collect()
    }

    /// Trade rate per interval.
    pub fn trade_rates(&self) -> Vec<f64> {
        self.trade_list
            .iter()
            .zip(self.time_nodes.windows(2))
            .map(|(n, w)| n / (w[1] - w[0]))
            .collect()
    }

    /// Holdings at the first node.
    pub fn start_holdings(&self) -> f64 {
        self.holdings[0]
    }

    /// Holdings at the last node.
    pub fn final_holdings(&self) -> f64 {
        self.holdings[self.holdings.len() - 1]
    }

    /// Whether the final holdings are zero to within the trade tolerance.
    pub fn is_liquidating(&self) -> bool {
        self.final_holdings().abs() <= TRADE_TOLERANCE * self.start_holdings().abs().max(1.0)
    }

    /// Total horizon.
    pub fn horizon(&self) -> f64 {
        self.time_nodes[self.time_nodes.len() - 1] - self.time_nodes[0]
    }
}
