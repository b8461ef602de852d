//! The fixed catalog of multi-leg option structures.

use crate::types::{
    InstrumentKind::{Call, Put, Stock},
    LegAction::{Buy, Hold, Sell},
    Moneyness::{Atm, HigherOtm, LowerOtm, Otm, Spot},
    RiskProfile, StrategyBias, StrategyDefinition, StrategyLeg,
};

pub const CATALOG: &[StrategyDefinition] = &[
    StrategyDefinition {
        name: "Covered Call",
        risk_profile: RiskProfile::Moderate,
        bias: StrategyBias::Bullish,
        legs: &[
            StrategyLeg {
                action: Hold,
                instrument: Stock,
                moneyness: Spot,
                quantity: 1,
                note: "Existing long equity position",
            },
            StrategyLeg {
                action: Sell,
                instrument: Call,
                moneyness: Otm,
                quantity: 1,
                note: "Write 1 OTM call for income",
            },
        ],
    },
    StrategyDefinition {
        name: "Protective Put",
        risk_profile: RiskProfile::Moderate,
        bias: StrategyBias::BullishRiskOff,
        legs: &[
            StrategyLeg {
                action: Hold,
                instrument: Stock,
                moneyness: Spot,
                quantity: 1,
                note: "Maintain long equity exposure",
            },
            StrategyLeg {
                action: Buy,
                instrument: Put,
                moneyness: Atm,
                quantity: 1,
                note: "Buy ATM put as insurance",
            },
        ],
    },
    StrategyDefinition {
        name: "Bull Call Spread",
        risk_profile: RiskProfile::Moderate,
        bias: StrategyBias::Bullish,
        legs: &[
            StrategyLeg {
                action: Buy,
                instrument: Call,
                moneyness: Atm,
                quantity: 1,
                note: "Buy ATM call",
            },
            StrategyLeg {
                action: Sell,
                instrument: Call,
                moneyness: Otm,
                quantity: 1,
                note: "Sell higher strike call",
            },
        ],
    },
    StrategyDefinition {
        name: "Bear Put Spread",
        risk_profile: RiskProfile::Moderate,
        bias: StrategyBias::Bearish,
        legs: &[
            StrategyLeg {
                action: Buy,
                instrument: Put,
                moneyness: Atm,
                quantity: 1,
                note: "Buy ATM put",
            },
            StrategyLeg {
                action: Sell,
                instrument: Put,
                moneyness: Otm,
                quantity: 1,
                note: "Sell lower strike put",
            },
        ],
    },
    StrategyDefinition {
        name: "Bull Put Spread",
        risk_profile: RiskProfile::Moderate,
        bias: StrategyBias::BullishIncome,
        legs: &[
            StrategyLeg {
                action: Sell,
                instrument: Put,
                moneyness: Otm,
                quantity: 1,
                note: "Sell OTM put to collect premium",
            },
            StrategyLeg {
                action: Buy,
                instrument: Put,
                moneyness: LowerOtm,
                quantity: 1,
                note: "Buy further OTM put for protection",
            },
        ],
    },
    StrategyDefinition {
        name: "Bear Call Spread",
        risk_profile: RiskProfile::Moderate,
        bias: StrategyBias::BearishIncome,
        legs: &[
            StrategyLeg {
                action: Sell,
                instrument: Call,
                moneyness: Otm,
                quantity: 1,
                note: "Sell OTM call to collect premium",
            },
            StrategyLeg {
                action: Buy,
                instrument: Call,
                moneyness: HigherOtm,
                quantity: 1,
                note: "Buy further OTM call for protection",
            },
        ],
    },
    StrategyDefinition {
        name: "Iron Condor",
        risk_profile: RiskProfile::Neutral,
        bias: StrategyBias::RangeBound,
        legs: &[
            StrategyLeg {
                action: Sell,
                instrument: Call,
                moneyness: Otm,
                quantity: 1,
                note: "Sell OTM call spread",
            },
            StrategyLeg {
                action: Buy,
                instrument: Call,
                moneyness: HigherOtm,
                quantity: 1,
                note: "Buy further OTM call",
            },
            StrategyLeg {
                action: Sell,
                instrument: Put,
                moneyness: Otm,
                quantity: 1,
                note: "Sell OTM put spread",
            },
            StrategyLeg {
                action: Buy,
                instrument: Put,
                moneyness: LowerOtm,
                quantity: 1,
                note: "Buy further OTM put",
            },
        ],
    },
    StrategyDefinition {
        name: "Iron Butterfly",
        risk_profile: RiskProfile::Neutral,
        bias: StrategyBias::RangeBoundTight,
        legs: &[
            StrategyLeg {
                action: Sell,
                instrument: Call,
                moneyness: Atm,
                quantity: 1,
                note: "Sell ATM call",
            },
            StrategyLeg {
                action: Sell,
                instrument: Put,
                moneyness: Atm,
                quantity: 1,
                note: "Sell ATM put",
            },
            StrategyLeg {
                action: Buy,
                instrument: Call,
                moneyness: Otm,
                quantity: 1,
                note: "Buy higher strike call",
            },
            StrategyLeg {
                action: Buy,
                instrument: Put,
                moneyness: Otm,
                quantity: 1,
                note: "Buy lower strike put",
            },
        ],
    },
    StrategyDefinition {
        name: "Long Straddle",
        risk_profile: RiskProfile::Aggressive,
        bias: StrategyBias::VolatilityExpansion,
        legs: &[
            StrategyLeg {
                action: Buy,
                instrument: Call,
                moneyness: Atm,
                quantity: 1,
                note: "Buy ATM call",
            },
            StrategyLeg {
                action: Buy,
                instrument: Put,
                moneyness: Atm,
                quantity: 1,
                note: "Buy ATM put",
            },
        ],
    },
    StrategyDefinition {
        name: "Long Strangle",
        risk_profile: RiskProfile::Aggressive,
        bias: StrategyBias::VolatilityExpansion,
        legs: &[
            StrategyLeg {
                action: Buy,
                instrument: Call,
                moneyness: Otm,
                quantity: 1,
                note: "Buy slightly OTM call",
            },
            StrategyLeg {
                action: Buy,
                instrument: Put,
                moneyness: Otm,
                quantity: 1,
                note: "Buy slightly OTM put",
            },
        ],
    },
];
