//! Sales pipeline roll-up over a set of deals.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::Deal;
use crate::enums::DealStage;

/// Count and value of deals sitting in one stage.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct StageTotals {
    pub stage: DealStage,
    pub count: u64,
    pub value: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct PipelineSummary {
    /// One entry per stage, in pipeline order, including empty stages.
    pub stages: Vec<StageTotals>,
    pub total_value: f64,
    /// Value of deals that are not closed.
    pub pipeline_value: f64,
    pub won_value: f64,
    pub active_deals: u64,
    pub won_deals: u64,
    /// Won / closed, in percent; 0 when nothing has closed.
    pub win_rate: f64,
}

#[must_use]
pub fn pipeline_summary(deals: &[Deal]) -> PipelineSummary {
    let stages = DealStage::ALL
        .iter()
        .map(|stage| {
            let in_stage = deals.iter().filter(|deal| deal.stage == *stage);
            StageTotals {
                stage: *stage,
                count: in_stage.clone().count() as u64,
                value: in_stage.map(|deal| deal.value).sum(),
            }
        })
        .collect::<Vec<_>>();

    let total_for = |pick: fn(DealStage) -> bool| -> (u64, f64) {
        stages
            .iter()
            .filter(|totals| pick(totals.stage))
            .fold((0, 0.0), |(count, value), totals| {
                (count + totals.count, value + totals.value)
            })
    };

    let (active_deals, pipeline_value) = total_for(|stage| !stage.is_closed());
    let (won_deals, won_value) = total_for(|stage| stage == DealStage::ClosedWon);
    let (closed_deals, _) = total_for(DealStage::is_closed);
    let total_value = stages.iter().map(|totals| totals.value).sum();

    let win_rate = if closed_deals > 0 {
        won_deals as f64 / closed_deals as f64 * 100.0
    } else {
        0.0
    };

    PipelineSummary {
        stages,
        total_value,
        pipeline_value,
        won_value,
        active_deals,
        won_deals,
        win_rate,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use pretty_assertions::assert_eq;

    fn deal(name: &str, value: f64, stage: DealStage) -> Deal {
        let now = Utc::now();
        Deal {
            id: 0,
            deal_name: name.to_string(),
            customer_id: None,
            value,
            stage,
            probability: 0,
            close_date: None,
            sales_rep: None,
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn empty_pipeline_has_every_stage_and_zero_win_rate() {
        let summary = pipeline_summary(&[]);
        assert_eq!(summary.stages.len(), DealStage::ALL.len());
        assert!(summary.stages.iter().all(|s| s.count == 0));
        assert_eq!(summary.win_rate, 0.0);
    }

    #[test]
    fn rolls_up_by_stage() {
        let deals = vec![
            deal("TechCorp Implementation", 25_000.0, DealStage::Proposal),
            deal("FinancePlus Integration", 35_000.0, DealStage::Negotiation),
            deal("Health Solutions Platform", 18_000.0, DealStage::Qualified),
            deal("EduTech Training Module", 12_000.0, DealStage::ClosedWon),
            deal("Retail Pilot", 5_000.0, DealStage::ClosedLost),
        ];
        let summary = pipeline_summary(&deals);

        assert_eq!(summary.active_deals, 3);
        assert_eq!(summary.won_deals, 1);
        assert_eq!(summary.pipeline_value, 78_000.0);
        assert_eq!(summary.won_value, 12_000.0);
        assert_eq!(summary.total_value, 95_000.0);
        assert_eq!(summary.win_rate, 50.0);

        let stage_order: Vec<DealStage> = summary.stages.iter().map(|s| s.stage).collect();
        assert_eq!(stage_order, DealStage::ALL.to_vec());
        assert_eq!(summary.stages[0].count, 0);
        assert_eq!(summary.stages[2].value, 25_000.0);
    }
}
