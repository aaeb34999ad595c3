//! Keyword-driven intent responder.
//!
//! Lower-cases the input, walks an ordered list of keyword groups, and
//! returns the canned reply of the first group with a substring hit.
//! Input that matches nothing gets the default help reply.

use serde::{Deserialize, Serialize};

// =============================================================================
// Topics
// =============================================================================

/// The canned reply a message was routed to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topic {
    /// Crop yield and farm productivity.
    Yield,
    /// Irrigation scheduling and water use.
    Irrigation,
    /// Precision agriculture and farm technology.
    Precision,
    /// Soil testing and soil health.
    Soil,
    /// Catch-all help message.
    General,
}

/// Keyword groups in match order. The first group with a hit wins.
static KEYWORD_GROUPS: &[(Topic, &[&str])] = &[
    (Topic::Yield, &["yield", "productivity"]),
    (Topic::Irrigation, &["irrigation", "water"]),
    (Topic::Precision, &["precision", "technology"]),
    (Topic::Soil, &["soil", "health"]),
];

// =============================================================================
// Canned replies
// =============================================================================

const YIELD_REPLY: &str = "Great question about crop yields! Here are proven ways to boost productivity:

**1. Precision planting**
Use variable-rate seeding to match plant population to each zone's potential. Farmers typically see 5-10% yield gains.

**2. Nutrient management**
Split nitrogen applications and base rates on soil tests rather than blanket recommendations. Tissue testing mid-season catches deficiencies before they cost you bushels.

**3. Integrated pest management**
Scout weekly, use economic thresholds, and rotate modes of action to protect yield without overspending on inputs.

**4. Data-driven decisions**
Compare yield maps across seasons to find consistently underperforming areas and target them with drainage, lime, or seeding changes.

Would you like a deeper dive into any of these strategies?";

const IRRIGATION_REPLY: &str = "Smart water management can cut water use by 20-40% while maintaining yields. Here's what works:

**Soil moisture monitoring**
Install sensors at multiple root-zone depths and irrigate on measured need instead of a fixed calendar.

**Drip and micro-irrigation**
Delivering water directly to the root zone reaches 90%+ application efficiency compared to roughly 60% for flood irrigation.

**Weather-based scheduling**
Use evapotranspiration (ET) data and rainfall forecasts to skip unnecessary cycles automatically.

**Variable rate irrigation**
Pivot systems with zone control apply less water on low-lying or heavier soils and more where the crop needs it.

Tip: irrigating in the early morning reduces evaporation losses by up to 30%.";

const PRECISION_REPLY: &str = "Precision agriculture is transforming how farms operate. Key technologies to consider:

**GPS guidance and auto-steer**
Reduces overlap to under 2%, saving fuel, seed, and chemicals on every pass.

**Drones and satellite imagery**
NDVI crop health maps reveal stress days before it's visible from the ground, so you can scout the right spots.

**IoT sensor networks**
Real-time readings of soil moisture, temperature, and weather feed directly into management decisions.

**Variable rate technology (VRT)**
Apply seed, fertilizer, and crop protection at rates matched to each management zone.

**Farm management software**
Brings all your data together for planning, record keeping, and profitability analysis.

Start with the technology that addresses your biggest pain point and expand from there.";

const SOIL_REPLY: &str = "Healthy soil is the foundation of a productive farm. Here's how to build it:

**Regular soil testing**
Test every 2-3 years (or annually on intensive ground) for pH, organic matter, N-P-K, and micronutrients.

**Cover crops**
Cereal rye, clover, and radish mixes reduce erosion, build organic matter, and improve water infiltration.

**Reduced tillage**
No-till or strip-till preserves soil structure, protects biology, and saves fuel and labor.

**Crop rotation**
Diverse rotations break pest and disease cycles and balance nutrient demand across seasons.

**Organic amendments**
Compost and manure feed soil biology and improve water-holding capacity.

Key indicators of healthy soil: earthworm activity, good aggregate structure, and an earthy smell.";

const DEFAULT_REPLY: &str = "I'm your AI farming assistant, here to help you make better decisions on your farm.

I can share guidance on:
- **Crop yields** and productivity improvements
- **Irrigation** and water management
- **Precision agriculture** technology
- **Soil health** and fertility

Try asking something like \"How can I increase my corn yield?\" or \"What's the best irrigation schedule for my fields?\"";

const WELCOME_TEXT: &str = "Hello! I'm your AI farming assistant. Ask me anything about crop yields, irrigation, precision agriculture, or soil health.";

// =============================================================================
// CannedReply
// =============================================================================

/// The reply chosen for a message: the topic, the verbatim text, and the
/// follow-up suggestions that go with it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CannedReply {
    pub topic: Topic,
    pub text: &'static str,
    pub suggestions: &'static [&'static str],
}

impl CannedReply {
    /// Owned copy of the suggestions, for building a transcript message.
    pub fn suggestion_list(&self) -> Vec<String> {
        self.suggestions.iter().map(|s| s.to_string()).collect()
    }
}

// =============================================================================
// IntentResponder
// =============================================================================

/// Rule-based responder over the fixed keyword table.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntentResponder;

impl IntentResponder {
    pub fn new() -> Self {
        Self
    }

    /// Pick the topic for a piece of free text.
    ///
    /// Checks groups in order: Yield, Irrigation, Precision, Soil. Falls back
    /// to `General` if nothing matches.
    pub fn classify(&self, input: &str) -> Topic {
        let lowered = input.to_lowercase();
        KEYWORD_GROUPS
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|kw| lowered.contains(kw)))
            .map(|(topic, _)| *topic)
            .unwrap_or(Topic::General)
    }

    /// Return the canned reply for a piece of free text.
    pub fn respond(&self, input: &str) -> CannedReply {
        let topic = self.classify(input);
        tracing::debug!(?topic, input_len = input.len(), "Responder matched topic");
        Self::reply_for(topic)
    }

    /// The canned reply for a given topic.
    pub fn reply_for(topic: Topic) -> CannedReply {
        match topic {
            Topic::Yield => CannedReply {
                topic,
                text: YIELD_REPLY,
                suggestions: &[
                    "Tell me about precision planting",
                    "How do I optimize fertilizer use?",
                    "What data should I track?",
                ],
            },
            Topic::Irrigation => CannedReply {
                topic,
                text: IRRIGATION_REPLY,
                suggestions: &[
                    "What soil moisture sensors do you recommend?",
                    "How does drip irrigation compare to pivots?",
                    "How do I use ET data?",
                ],
            },
            Topic::Precision => CannedReply {
                topic,
                text: PRECISION_REPLY,
                suggestions: &[
                    "Where should I start with precision ag?",
                    "How do drones help with crop scouting?",
                    "What is variable rate technology?",
                ],
            },
            Topic::Soil => CannedReply {
                topic,
                text: SOIL_REPLY,
                suggestions: &[
                    "Which cover crops should I plant?",
                    "How often should I test my soil?",
                    "What are the benefits of no-till?",
                ],
            },
            Topic::General => CannedReply {
                topic,
                text: DEFAULT_REPLY,
                suggestions: &STARTER_SUGGESTIONS,
            },
        }
    }

    /// Greeting that opens every conversation.
    pub fn welcome() -> CannedReply {
        CannedReply {
            topic: Topic::General,
            text: WELCOME_TEXT,
            suggestions: &STARTER_SUGGESTIONS,
        }
    }
}

static STARTER_SUGGESTIONS: [&str; 4] = [
    "How can I increase my crop yield?",
    "What's the best irrigation schedule?",
    "Tell me about precision agriculture",
    "How do I improve soil health?",
];

// =============================================================================
// Tests
// =============================================================================
