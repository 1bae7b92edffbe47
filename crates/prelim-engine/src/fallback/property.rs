use prelim_types::PropertyIdentity;

use super::field_lines;
use crate::patterns::{money_from_value, stated_text};

const ADDRESS: &[&str] = &["address", "property address", "situs address", "property"];
const PARCEL: &[&str] = &[
    "apn",
    "parcel",
    "parcel no",
    "parcel number",
    "parcel id",
    "assessor's parcel no",
    "assessor's parcel number",
];
const EFFECTIVE_DATE: &[&str] = &["effective date", "as of", "report date"];
const LOAN_AMOUNT: &[&str] = &["proposed loan amount", "proposed amount", "loan amount"];
const LENDER: &[&str] = &["proposed lender", "proposed insured lender", "lender", "proposed insured"];

/// Property identity from the narrative's PROPERTY INFORMATION section
pub fn parse_property(content: &str) -> PropertyIdentity {
    let fields = field_lines(content);
    PropertyIdentity {
        address: stated_text(fields.first(ADDRESS)),
        parcel_id: stated_text(fields.first(PARCEL)),
        effective_date: stated_text(fields.first(EFFECTIVE_DATE)),
        proposed_loan_amount: money_from_value(fields.first(LOAN_AMOUNT)),
        proposed_lender: stated_text(fields.first(LENDER)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use prelim_types::Stated;

    #[test]
    fn test_parse_property_fields() {
        let property = parse_property(
            "- Address: 123 Main St, Springfield, CA\n- APN: 123-456-789\n- Proposed Loan Amount: $600,000.00\n- Proposed Lender: Unclear",
        );
        assert_eq!(
            property.address,
            Stated::Value("123 Main St, Springfield, CA".to_string())
        );
        assert_eq!(property.parcel_id, Stated::Value("123-456-789".to_string()));
        assert_eq!(
            property.proposed_loan_amount,
            Stated::Value("$600,000.00".to_string())
        );
        assert_eq!(property.proposed_lender, Stated::Unclear);
        assert_eq!(property.effective_date, Stated::NotStated);
    }
}
