//! Option lists offered by the quote request pages.

/// One selectable option: the submitted value and its display label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogOption {
    pub value: &'static str,
    pub label: &'static str,
}

const fn option(value: &'static str, label: &'static str) -> CatalogOption {
    CatalogOption { value, label }
}

pub const SERVICES: &[CatalogOption] = &[
    option("cabinet-making", "Cabinet Making and Installation"),
    option("painting", "Interior and Exterior Painting"),
    option("junk-removal", "Junk Removal and Hauling"),
    option("bathroom-fixtures", "Bathroom Fixture and Repair"),
    option("repairs", "Repairs"),
    option("electrical", "Electrical and Fixtures"),
    option("plumbing", "Plumbing"),
    option("furniture-installation", "Furniture Installation"),
    option("general-repairs", "General Repairs"),
    option("cleaning", "Before and After Cleaning"),
    option("woodwork", "Woodwork"),
    option("basement-remodeling", "Basement Remodeling"),
    option("other", "Other"),
];

pub const BUDGETS: &[CatalogOption] = &[
    option("<5k", "Under $5,000"),
    option("5k-15k", "$5,000 - $15,000"),
    option("15k-30k", "$15,000 - $30,000"),
    option(">30k", "Over $30,000"),
];

pub const TIMELINES: &[CatalogOption] = &[
    option("asap", "As soon as possible"),
    option("1-month", "Within 1 month"),
    option("2-3-months", "2-3 months"),
];

pub const REFERRAL_SOURCES: &[CatalogOption] = &[
    option("google", "Google Search"),
    option("social", "Social Media"),
    option("referral", "Friend / Referral"),
];

/// Finds an option by value, or by label ignoring ASCII case.
pub fn find<'a>(options: &'a [CatalogOption], input: &str) -> Option<&'a CatalogOption> {
    let needle = input.trim();
    options.iter().find(|candidate| {
        candidate.value.eq_ignore_ascii_case(needle) || candidate.label.eq_ignore_ascii_case(needle)
    })
}

pub fn label_for(options: &[CatalogOption], value: &str) -> Option<&'static str> {
    options
        .iter()
        .find(|candidate| candidate.value == value)
        .map(|candidate| candidate.label)
}
