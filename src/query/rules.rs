//! Keyword rule table for the query interpreter
//!
//! Every rule is tested against the full normalized text; rules are never
//! mutually exclusive and never short-circuit. A query mentioning both
//! "премиум" and "немецкую" unions the brand sets of both rules.

/// Default lower price bound applied by a semantic trigger when the text
/// carries no explicit "от ..." bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceFloor {
    /// "дорогую"/"премиум" class of queries
    Premium,
    /// "люкс"/"роскошную" class of queries
    Luxury,
}

/// One contribution a triggered rule makes to the filter record
#[derive(Debug, Clone, Copy)]
pub enum Effect {
    BodyTypes(&'static [&'static str]),
    Tags(&'static [&'static str]),
    Brands(&'static [&'static str]),
    TitleTerms(&'static [&'static str]),
    DefaultFloor(PriceFloor),
}

/// A substring-triggered rule
pub struct KeywordRule {
    pub name: &'static str,
    /// Rule fires when any trigger occurs in the lowercased text
    pub triggers: &'static [&'static str],
    pub effects: &'static [Effect],
}

impl KeywordRule {
    pub fn matches(&self, text: &str) -> bool {
        self.triggers.iter().any(|t| text.contains(t))
    }
}

/// The full rule list, evaluated in order. Order only matters for set
/// insertion order; every rule sees the whole text.
pub const KEYWORD_RULES: &[KeywordRule] = &[
    KeywordRule {
        name: "body_suv",
        triggers: &["внедорожник", "джип", "кроссовер"],
        effects: &[Effect::BodyTypes(&["SUV", "crossover"])],
    },
    KeywordRule {
        name: "body_sedan",
        triggers: &["седан"],
        effects: &[Effect::BodyTypes(&["sedan"])],
    },
    KeywordRule {
        name: "body_hatchback",
        triggers: &["хэтчбек", "хетчбек"],
        effects: &[Effect::BodyTypes(&["hatchback"])],
    },
    KeywordRule {
        name: "tag_comfort",
        triggers: &["комфорт"],
        effects: &[Effect::Tags(&["comfort"])],
    },
    KeywordRule {
        name: "tag_family",
        triggers: &["семейн"],
        effects: &[Effect::Tags(&["family"])],
    },
    KeywordRule {
        name: "tag_economy",
        triggers: &["экономич", "экономн"],
        effects: &[Effect::Tags(&["economy"])],
    },
    KeywordRule {
        name: "tag_big_trunk",
        triggers: &["большой багажник", "большим багажником"],
        effects: &[Effect::Tags(&["big_trunk"])],
    },
    KeywordRule {
        name: "tag_city",
        triggers: &["городск", "для города"],
        effects: &[Effect::Tags(&["city"])],
    },
    KeywordRule {
        name: "premium",
        triggers: &["дорог", "премиум"],
        effects: &[
            Effect::Tags(&["premium", "luxury"]),
            Effect::Brands(&["BMW", "Mercedes-Benz", "Audi", "Lexus"]),
            Effect::DefaultFloor(PriceFloor::Premium),
        ],
    },
    KeywordRule {
        name: "luxury",
        triggers: &["люкс", "роскош"],
        effects: &[
            Effect::Tags(&["premium", "luxury"]),
            Effect::DefaultFloor(PriceFloor::Luxury),
        ],
    },
    KeywordRule {
        name: "brands_german",
        triggers: &["немец", "герман"],
        effects: &[Effect::Brands(&["BMW", "Mercedes-Benz", "Audi", "Volkswagen"])],
    },
    KeywordRule {
        name: "brands_japanese",
        triggers: &["япон"],
        effects: &[Effect::Brands(&["Toyota", "Lexus"])],
    },
    KeywordRule {
        name: "brands_korean",
        triggers: &["корей"],
        effects: &[Effect::Brands(&["Kia", "Hyundai"])],
    },
    KeywordRule {
        name: "brands_czech",
        triggers: &["чеш"],
        effects: &[Effect::Brands(&["Skoda"])],
    },
    KeywordRule {
        name: "title_toyota",
        triggers: &["тойота", "тоёта"],
        effects: &[Effect::TitleTerms(&["Toyota"])],
    },
    KeywordRule {
        name: "title_bmw",
        triggers: &["бмв", "бэха"],
        effects: &[Effect::TitleTerms(&["BMW"])],
    },
    KeywordRule {
        name: "title_mercedes",
        triggers: &["мерседес", "мерс"],
        effects: &[Effect::TitleTerms(&["Mercedes"])],
    },
    KeywordRule {
        name: "title_audi",
        triggers: &["ауди"],
        effects: &[Effect::TitleTerms(&["Audi"])],
    },
    KeywordRule {
        name: "title_kia",
        triggers: &["киа"],
        effects: &[Effect::TitleTerms(&["Kia"])],
    },
    KeywordRule {
        name: "title_hyundai",
        triggers: &["хендай", "хёндай", "хюндай"],
        effects: &[Effect::TitleTerms(&["Hyundai"])],
    },
    KeywordRule {
        name: "title_skoda",
        triggers: &["шкода"],
        effects: &[Effect::TitleTerms(&["Skoda"])],
    },
    KeywordRule {
        name: "title_volkswagen",
        triggers: &["фольксваген"],
        effects: &[Effect::TitleTerms(&["Volkswagen"])],
    },
    KeywordRule {
        name: "title_lexus",
        triggers: &["лексус"],
        effects: &[Effect::TitleTerms(&["Lexus"])],
    },
];
