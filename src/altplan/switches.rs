//! Planner strategy switches
//!
//! Session-level settings the generator disables to force the planner away
//! from its first choice. Both bitmap subtypes fold into the single bitmap
//! switch, mirroring how the database exposes them.

use crate::plan::OperatorSubtype;

/// One disable-able planner strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrategySwitch {
    SeqScan,
    IndexScan,
    IndexOnlyScan,
    BitmapScan,
    HashJoin,
    MergeJoin,
    NestLoop,
}

impl StrategySwitch {
    /// Session setting name understood by the plan provider.
    pub fn setting(&self) -> &'static str {
        match self {
            StrategySwitch::SeqScan => "enable_seqscan",
            StrategySwitch::IndexScan => "enable_indexscan",
            StrategySwitch::IndexOnlyScan => "enable_indexonlyscan",
            StrategySwitch::BitmapScan => "enable_bitmapscan",
            StrategySwitch::HashJoin => "enable_hashjoin",
            StrategySwitch::MergeJoin => "enable_mergejoin",
            StrategySwitch::NestLoop => "enable_nestloop",
        }
    }

    /// The switch that disables a given operator subtype.
    pub fn for_subtype(subtype: OperatorSubtype) -> StrategySwitch {
        match subtype {
            OperatorSubtype::SeqScan => StrategySwitch::SeqScan,
            OperatorSubtype::IndexScan => StrategySwitch::IndexScan,
            OperatorSubtype::IndexOnlyScan => StrategySwitch::IndexOnlyScan,
            OperatorSubtype::BitmapIndexScan | OperatorSubtype::BitmapHeapScan => {
                StrategySwitch::BitmapScan
            }
            OperatorSubtype::HashJoin => StrategySwitch::HashJoin,
            OperatorSubtype::MergeJoin => StrategySwitch::MergeJoin,
            OperatorSubtype::NestedLoop => StrategySwitch::NestLoop,
        }
    }
}
