use serde::{Deserialize, Serialize};

use crate::error::LandingError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    MicroPayment,
    InformationFee,
    CreditCard,
}

impl Category {
    pub fn label(self) -> &'static str {
        match self {
            Category::MicroPayment => "소액결제",
            Category::InformationFee => "정보이용료",
            Category::CreditCard => "신용카드",
        }
    }

    pub fn css_class(self) -> &'static str {
        match self {
            Category::MicroPayment => "tp-mobile",
            Category::InformationFee => "tp-info",
            Category::CreditCard => "tp-card",
        }
    }
}

/// One sample activity entry. Names are already masked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedRecord {
    pub display_name: String,
    pub category: Category,
    pub amount: String,
    pub is_complete: bool,
    pub avatar_color: String,
}

impl FeedRecord {
    pub fn avatar_initial(&self) -> String {
        self.display_name.chars().next().map(String::from).unwrap_or_default()
    }
}

/// Non-empty, cyclically reused list of records.
#[derive(Debug, Clone, PartialEq)]
pub struct Fixture {
    records: Vec<FeedRecord>,
}

impl Fixture {
    pub fn new(records: Vec<FeedRecord>) -> Result<Self, LandingError> {
        if records.is_empty() {
            return Err(LandingError::InvalidConfig(
                "feed fixture must contain at least one record".to_string(),
            ));
        }
        Ok(Self { records })
    }

    pub fn from_json_str(raw: &str) -> Result<Self, LandingError> {
        let records: Vec<FeedRecord> = serde_json::from_str(raw)?;
        Self::new(records)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Record at an unbounded cursor position, wrapping around the list.
    pub fn at(&self, position: u64) -> (usize, &FeedRecord) {
        let index = (position % self.records.len() as u64) as usize;
        (index, &self.records[index])
    }

    /// The twelve sample entries shown on the page.
    pub fn builtin() -> Self {
        use Category::*;
        let entries = [
            ("김*수", MicroPayment, "35만원", true, "#00C8D7,#00897B"),
            ("이*영", InformationFee, "100만원", true, "#3DE0D6,#00C8D7"),
            ("박*준", CreditCard, "120만원", false, "#00897B,#004D40"),
            ("최*민", MicroPayment, "5만원", true, "#00C8D7,#00ADB8"),
            ("조*현", MicroPayment, "30만원", true, "#2DD4BF,#00897B"),
            ("임*지", InformationFee, "60만원", true, "#00ADB8,#007A6E"),
            ("오*석", CreditCard, "150만원", false, "#00897B,#00C8D7"),
            ("황*영", MicroPayment, "20만원", true, "#3DE0D6,#00897B"),
            ("유*나", InformationFee, "85만원", true, "#00C8D7,#00695C"),
            ("권*호", CreditCard, "300만원", false, "#00ADB8,#004D40"),
            ("장*아", MicroPayment, "15만원", true, "#2DD4BF,#00C8D7"),
            ("심*철", InformationFee, "45만원", true, "#00897B,#3DE0D6"),
        ];
        let records = entries
            .into_iter()
            .map(|(name, category, amount, is_complete, stops)| FeedRecord {
                display_name: name.to_string(),
                category,
                amount: amount.to_string(),
                is_complete,
                avatar_color: format!("linear-gradient(135deg,{})", stops),
            })
            .collect();
        Self { records }
    }
}
