//! Ground-truth records read directly from the report text

use serde::{Deserialize, Serialize};

use crate::stated::{format_cents, parse_cents, Money, Stated};

/// Property identity block
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyIdentity {
    pub address: Stated<String>,
    pub parcel_id: Stated<String>,
    pub effective_date: Stated<String>,
    pub proposed_loan_amount: Money,
    pub proposed_lender: Stated<String>,
}

impl PropertyIdentity {
    pub fn is_empty(&self) -> bool {
        !(self.address.is_value()
            || self.parcel_id.is_value()
            || self.effective_date.is_value()
            || self.proposed_loan_amount.is_value()
            || self.proposed_lender.is_value())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InstallmentStatus {
    Paid,
    Open,
    Delinquent,
}

/// One secured-roll tax parcel
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxParcel {
    pub item_number: Option<u32>,
    pub tax_id: Stated<String>,
    pub fiscal_year: Stated<String>,
    pub first_installment_amount: Money,
    pub first_installment_status: Stated<InstallmentStatus>,
    pub second_installment_amount: Money,
    pub second_installment_status: Stated<InstallmentStatus>,
    pub penalty: Money,
    pub homeowner_exemption: Money,
    pub code_area: Stated<String>,
}

impl TaxParcel {
    /// Both installments as `(amount, status)` pairs
    pub fn installments(&self) -> [(&Money, &Stated<InstallmentStatus>); 2] {
        [
            (
                &self.first_installment_amount,
                &self.first_installment_status,
            ),
            (
                &self.second_installment_amount,
                &self.second_installment_status,
            ),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedemptionEntry {
    pub amount: Money,
    pub due_by: Stated<String>,
}

/// A prior-year tax default with its escalating redemption amounts
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxDefault {
    pub item_number: Option<u32>,
    pub default_number: Stated<String>,
    pub parcel_id: Option<String>,
    pub message: String,
    /// In source order
    pub redemption_schedule: Vec<RedemptionEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OtherAssessment {
    pub item_number: Option<u32>,
    pub assessment_type: String,
    pub amount: Money,
    pub details: String,
}

/// A trustee substitution or beneficial-interest assignment
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainEntry {
    pub actor: Stated<String>,
    pub recording_number: Stated<String>,
    pub recording_date: Stated<String>,
}

/// A deed of trust and its chain of title
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LienRecord {
    /// Ordinal label: `1st`, `2nd`, ...
    pub position: String,
    pub item_number: Option<u32>,
    pub amount: Money,
    pub beneficiary: Stated<String>,
    pub trustor: Stated<String>,
    pub trustee: Stated<String>,
    pub dated: Stated<String>,
    pub recording_number: Stated<String>,
    pub recording_date: Stated<String>,
    pub substitutions: Vec<ChainEntry>,
    pub assignments: Vec<ChainEntry>,
    pub has_notice_of_default: bool,
    pub has_notice_of_trustee_sale: bool,
    pub sale_date: Stated<String>,
}

impl LienRecord {
    /// Fill fields this record does not state from another record of the same lien.
    ///
    /// Stated values on `self` always win.
    pub fn fill_gaps_from(&mut self, other: &LienRecord) {
        self.amount.fill_from(other.amount.clone());
        self.beneficiary.fill_from(other.beneficiary.clone());
        self.trustor.fill_from(other.trustor.clone());
        self.trustee.fill_from(other.trustee.clone());
        self.dated.fill_from(other.dated.clone());
        self.recording_number
            .fill_from(other.recording_number.clone());
        self.recording_date.fill_from(other.recording_date.clone());
        self.sale_date.fill_from(other.sale_date.clone());
        if self.substitutions.is_empty() {
            self.substitutions = other.substitutions.clone();
        }
        if self.assignments.is_empty() {
            self.assignments = other.assignments.clone();
        }
        self.has_notice_of_default |= other.has_notice_of_default;
        self.has_notice_of_trustee_sale |= other.has_notice_of_trustee_sale;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HoaLienStatus {
    Delinquent,
    Recorded,
    Released,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoaLien {
    pub item_number: Option<u32>,
    pub association_name: Stated<String>,
    pub amount: Money,
    pub status: HoaLienStatus,
    pub recording_number: Stated<String>,
    pub recording_date: Stated<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ForeclosureNoticeType {
    UsRedemption,
    TrusteesDeedException,
    NoticeOfTrusteeSale,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForeclosureNotice {
    pub item_number: Option<u32>,
    pub notice_type: ForeclosureNoticeType,
    pub sale_date: Stated<String>,
    pub sale_time: Stated<String>,
    pub sale_location: Stated<String>,
}

/// Root aggregate: one per analyzed document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedFacts {
    pub property: PropertyIdentity,
    pub tax_parcels: Vec<TaxParcel>,
    pub tax_defaults: Vec<TaxDefault>,
    pub other_assessments: Vec<OtherAssessment>,
    pub lien_records: Vec<LienRecord>,
    pub hoa_liens: Vec<HoaLien>,
    pub foreclosure_notices: Vec<ForeclosureNotice>,
    /// Derived; see [`ExtractedFacts::refresh_aggregates`]
    pub has_delinquent_taxes: bool,
    /// Derived; see [`ExtractedFacts::refresh_aggregates`]
    pub total_delinquent_amount: Money,
    /// Derived; see [`ExtractedFacts::refresh_aggregates`]
    pub total_redemption_amount: Money,
}

impl Default for ExtractedFacts {
    fn default() -> Self {
        Self {
            property: PropertyIdentity::default(),
            tax_parcels: Vec::new(),
            tax_defaults: Vec::new(),
            other_assessments: Vec::new(),
            lien_records: Vec::new(),
            hoa_liens: Vec::new(),
            foreclosure_notices: Vec::new(),
            has_delinquent_taxes: false,
            total_delinquent_amount: Stated::Value(format_cents(0)),
            total_redemption_amount: Stated::Value(format_cents(0)),
        }
    }
}

/// Sum of money literals; `UNCLEAR` as soon as one addend is not a literal
fn sum_money<'a>(amounts: impl IntoIterator<Item = &'a Money>) -> Money {
    let mut cents = 0u64;
    for amount in amounts {
        match amount.value().and_then(|a| parse_cents(a)) {
            Some(value) => cents = cents.saturating_add(value),
            None => return Stated::Unclear,
        }
    }
    Stated::Value(format_cents(cents))
}

impl ExtractedFacts {
    /// Recompute the derived tax aggregates from the parcel and default lists.
    ///
    /// `totalDelinquentAmount` sums exactly the `DELINQUENT` installments.
    /// `totalRedemptionAmount` sums the first (earliest) redemption amount of
    /// each default. A total with any addend that is not a money literal is
    /// `UNCLEAR`; the delinquent flag still reflects the status alone.
    pub fn refresh_aggregates(&mut self) {
        let delinquent: Vec<&Money> = self
            .tax_parcels
            .iter()
            .flat_map(|parcel| parcel.installments())
            .filter(|(_, status)| status.value() == Some(&InstallmentStatus::Delinquent))
            .map(|(amount, _)| amount)
            .collect();

        let redemption: Vec<&Money> = self
            .tax_defaults
            .iter()
            .filter_map(|d| d.redemption_schedule.first())
            .map(|entry| &entry.amount)
            .collect();

        self.has_delinquent_taxes = !delinquent.is_empty();
        self.total_delinquent_amount = sum_money(delinquent);
        self.total_redemption_amount = sum_money(redemption);
    }

    pub fn is_empty(&self) -> bool {
        self.property.is_empty()
            && self.tax_parcels.is_empty()
            && self.tax_defaults.is_empty()
            && self.other_assessments.is_empty()
            && self.lien_records.is_empty()
            && self.hoa_liens.is_empty()
            && self.foreclosure_notices.is_empty()
    }
}
