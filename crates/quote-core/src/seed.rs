//! # Built-in Pricing Tables
//!
//! The default catalog, bundles, promo codes and upsell chain. Deployments
//! override any of them from the shell's config file; these seeds are what a
//! fresh install quotes with.
//!
//! All amounts are whole SAR.

use crate::tables::{PricingRates, TableConfig};
use crate::types::{BundleDefinition, PromoCode, Rate, ServiceCatalogItem};
use crate::upsell::{UpsellRule, UpsellTrigger};

struct ServiceSeed {
    id: &'static str,
    name: &'static str,
    description: &'static str,
    professional_fee: i64,
    government_fee: i64,
    category: &'static str,
}

const SERVICE_SEEDS: &[ServiceSeed] = &[
    ServiceSeed {
        id: "misa-license",
        name: "MISA Investment License",
        description: "Foreign investment license from the Ministry of Investment",
        professional_fee: 12_000,
        government_fee: 2_000,
        category: "licensing",
    },
    ServiceSeed {
        id: "cr-registration",
        name: "Commercial Registration (CR)",
        description: "Company registration with the Ministry of Commerce",
        professional_fee: 4_500,
        government_fee: 1_200,
        category: "registration",
    },
    ServiceSeed {
        id: "articles-of-association",
        name: "Articles of Association",
        description: "Drafting and notarization of the articles of association",
        professional_fee: 3_500,
        government_fee: 500,
        category: "legal",
    },
    ServiceSeed {
        id: "chamber-membership",
        name: "Chamber of Commerce Membership",
        description: "First-year chamber subscription and certificate",
        professional_fee: 1_500,
        government_fee: 1_100,
        category: "registration",
    },
    ServiceSeed {
        id: "national-address",
        name: "National Address Registration",
        description: "Saudi Post national address for the entity",
        professional_fee: 500,
        government_fee: 0,
        category: "registration",
    },
    ServiceSeed {
        id: "zatca-vat-registration",
        name: "ZATCA Tax & VAT Registration",
        description: "Zakat, income tax and VAT registration",
        professional_fee: 2_500,
        government_fee: 0,
        category: "tax",
    },
    ServiceSeed {
        id: "gosi-registration",
        name: "GOSI Registration",
        description: "Social insurance employer registration",
        professional_fee: 1_500,
        government_fee: 0,
        category: "workforce",
    },
    ServiceSeed {
        id: "qiwa-setup",
        name: "Qiwa & Mudad Setup",
        description: "Labor platform and payroll protection onboarding",
        professional_fee: 2_000,
        government_fee: 0,
        category: "workforce",
    },
    ServiceSeed {
        id: "work-visa-block",
        name: "Work Visa Block",
        description: "Block visa application for expatriate hires",
        professional_fee: 3_000,
        government_fee: 2_000,
        category: "visa",
    },
    ServiceSeed {
        id: "iqama-processing",
        name: "Iqama Processing",
        description: "Residence permit issuance for one employee",
        professional_fee: 2_500,
        government_fee: 650,
        category: "visa",
    },
    ServiceSeed {
        id: "municipality-license",
        name: "Municipality (Baladiya) License",
        description: "Commercial premises license",
        professional_fee: 3_000,
        government_fee: 800,
        category: "licensing",
    },
    ServiceSeed {
        id: "trademark-registration",
        name: "Trademark Registration",
        description: "SAIP trademark filing for one class",
        professional_fee: 5_000,
        government_fee: 7_500,
        category: "intellectual property",
    },
    ServiceSeed {
        id: "bank-account-opening",
        name: "Corporate Bank Account",
        description: "Document preparation and bank liaison",
        professional_fee: 2_000,
        government_fee: 0,
        category: "banking",
    },
    ServiceSeed {
        id: "legal-consultation",
        name: "Legal Consultation",
        description: "One-hour session with a corporate lawyer",
        professional_fee: 1_000,
        government_fee: 0,
        category: "advisory",
    },
];

const BUNDLE_SEEDS: &[(&str, &str, &[&str], i64)] = &[
    (
        "formation-starter",
        "Company Formation Starter",
        &["misa-license", "cr-registration", "articles-of-association"],
        2_500,
    ),
    (
        "post-cr-essentials",
        "Post-CR Essentials",
        &["cr-registration", "chamber-membership", "national-address"],
        1_000,
    ),
    (
        "compliance-pack",
        "Compliance Pack",
        &["zatca-vat-registration", "gosi-registration", "qiwa-setup"],
        1_500,
    ),
    (
        "workforce-pack",
        "Workforce Pack",
        &["work-visa-block", "iqama-processing"],
        1_500,
    ),
];

const PROMO_SEEDS: &[(&str, u32)] = &[
    ("WELCOME10", 1_000),
    ("VISION2030", 1_500),
    ("PARTNER20", 2_000),
];

/// Priority order matters: earlier rules win the two slots.
fn upsell_seeds() -> Vec<UpsellRule> {
    fn contains_any(ids: &[&str]) -> UpsellTrigger {
        UpsellTrigger::ContainsAny(ids.iter().map(|s| s.to_string()).collect())
    }
    fn rule(trigger: UpsellTrigger, suggest: &str) -> UpsellRule {
        UpsellRule {
            trigger,
            suggest: suggest.to_string(),
        }
    }

    vec![
        rule(UpsellTrigger::EmptyCart, "misa-license"),
        rule(contains_any(&["misa-license"]), "cr-registration"),
        rule(contains_any(&["cr-registration"]), "chamber-membership"),
        rule(UpsellTrigger::IdKeyword("visa".to_string()), "iqama-processing"),
        rule(UpsellTrigger::CategoryKeyword("visa".to_string()), "gosi-registration"),
        rule(UpsellTrigger::CategoryKeyword("licensing".to_string()), "zatca-vat-registration"),
        rule(contains_any(&["cr-registration"]), "bank-account-opening"),
        rule(contains_any(&["trademark-registration"]), "legal-consultation"),
    ]
}

fn services() -> Vec<ServiceCatalogItem> {
    SERVICE_SEEDS
        .iter()
        .map(|seed| ServiceCatalogItem {
            id: seed.id.to_string(),
            name: seed.name.to_string(),
            description: seed.description.to_string(),
            professional_fee: seed.professional_fee,
            government_fee: seed.government_fee,
            category: seed.category.to_string(),
        })
        .collect()
}

fn bundles() -> Vec<BundleDefinition> {
    BUNDLE_SEEDS
        .iter()
        .map(|(id, name, required, discount_amount)| BundleDefinition {
            id: id.to_string(),
            name: name.to_string(),
            required_item_ids: required.iter().map(|s| s.to_string()).collect(),
            discount_amount: *discount_amount,
        })
        .collect()
}

fn promos() -> Vec<PromoCode> {
    PROMO_SEEDS
        .iter()
        .map(|(code, bps)| PromoCode {
            code: code.to_string(),
            rate: Rate::from_bps(*bps),
        })
        .collect()
}

/// The complete built-in configuration.
pub fn builtin_config() -> TableConfig {
    TableConfig {
        rates: PricingRates::default(),
        services: services(),
        bundles: bundles(),
        promos: promos(),
        upsell_rules: upsell_seeds(),
        fallback_upsell: Some("legal-consultation".to_string()),
    }
}
