use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::forecast::WEEKLY_PERIOD;

/// Non-seasonal (p, d, q) order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ArimaOrder {
    pub p: usize,
    pub d: usize,
    pub q: usize,
}

/// Seasonal (P, D, Q, s) order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SeasonalOrder {
    pub p: usize,
    pub d: usize,
    pub q: usize,
    pub period: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SarimaSpec {
    pub order: ArimaOrder,
    pub seasonal: SeasonalOrder,
}

impl SarimaSpec {
    /// SARIMA(1,1,1)(1,1,0)[7]
    pub fn weekly() -> Self {
        Self {
            order: ArimaOrder { p: 1, d: 1, q: 1 },
            seasonal: SeasonalOrder {
                p: 1,
                d: 1,
                q: 0,
                period: WEEKLY_PERIOD,
            },
        }
    }

    pub fn parameter_count(&self) -> usize {
        self.order.p + self.order.q + self.seasonal.p + self.seasonal.q
    }

    /// Observations consumed by differencing
    pub fn differencing_lag(&self) -> usize {
        self.order.d + self.seasonal.d * self.seasonal.period
    }

    /// Highest lag of the expanded autoregressive polynomial
    pub fn max_ar_lag(&self) -> usize {
        self.order.p + self.seasonal.p * self.seasonal.period
    }

    /// Smallest series the model can be fitted on: the differencing loss,
    /// one full AR window, and more residuals than free parameters.
    pub fn min_observations(&self) -> usize {
        self.differencing_lag() + self.max_ar_lag() + self.parameter_count() + 1
    }
}

impl Default for SarimaSpec {
    fn default() -> Self {
        Self::weekly()
    }
}

/// Additive trend + additive seasonal exponential smoothing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct HoltWintersSpec {
    pub seasonal_period: usize,
}

impl HoltWintersSpec {
    pub fn weekly() -> Self {
        Self {
            seasonal_period: WEEKLY_PERIOD,
        }
    }

    /// Two full seasons are needed to initialise level, trend and seasonals
    pub fn min_observations(&self) -> usize {
        2 * self.seasonal_period
    }
}

impl Default for HoltWintersSpec {
    fn default() -> Self {
        Self::weekly()
    }
}
