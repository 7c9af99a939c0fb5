//! Narrative insights computed from the aggregates, and the fixed
//! strategic recommendation blocks.

use crate::{aggregate::Aggregates, types::Tier};

#[derive(Debug, Clone, PartialEq)]
pub struct Insight {
    pub title: &'static str,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Recommendation {
    pub heading: &'static str,
    pub actions: &'static [&'static str],
}

/// Group digits in threes: 12345 -> "12,345".
pub fn format_thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Tier 3 spoilage relative to Metro; 0 when Metro has no spoilage.
pub fn spoilage_ratio(metro: f64, tier3: f64) -> f64 {
    if metro > 0.0 {
        tier3 / metro
    } else {
        0.0
    }
}

pub fn key_insights(agg: &Aggregates) -> Vec<Insight> {
    let metro = agg.regional_for(Tier::Metro);
    let tier2 = agg.regional_for(Tier::Tier2);
    let tier3 = agg.regional_for(Tier::Tier3);
    let metro_behavior = agg.behavior_for(Tier::Metro);
    let tier3_behavior = agg.behavior_for(Tier::Tier3);

    let margin_gap = metro.margin_pct - tier3.margin_pct;
    let logistics_increase = if metro.avg_logistics_cost > 0.0 {
        (tier3.avg_logistics_cost - metro.avg_logistics_cost) / metro.avg_logistics_cost * 100.0
    } else {
        0.0
    };
    let retention_gap = metro_behavior.repeat_rate_pct - tier3_behavior.repeat_rate_pct;
    let delay = tier3.avg_delivery_hours - metro.avg_delivery_hours;
    let spoilage = spoilage_ratio(metro.avg_spoilage_cost, tier3.avg_spoilage_cost);
    let untapped = tier2.unique_customers + tier3.unique_customers;

    vec![
        Insight {
            title: "Margin Gap",
            text: format!(
                "Tier 3 cities have {margin_gap:.1}% lower margins than Metro ({:.1}% vs {:.1}%)",
                tier3.margin_pct, metro.margin_pct
            ),
        },
        Insight {
            title: "Logistics Challenge",
            text: format!(
                "Tier 3 logistics costs are {logistics_increase:.0}% higher than Metro (₹{:.2} vs ₹{:.2})",
                tier3.avg_logistics_cost, metro.avg_logistics_cost
            ),
        },
        Insight {
            title: "Retention Gap",
            text: format!(
                "Tier 3 repeat purchase rate is {retention_gap:.1}% lower than Metro ({:.1}% vs {:.1}%)",
                tier3_behavior.repeat_rate_pct, metro_behavior.repeat_rate_pct
            ),
        },
        Insight {
            title: "Delivery Delay",
            text: format!(
                "Tier 3 deliveries take {delay:.1} hours longer than Metro ({:.1}h vs {:.1}h)",
                tier3.avg_delivery_hours, metro.avg_delivery_hours
            ),
        },
        Insight {
            title: "Spoilage Issue",
            text: format!(
                "Tier 3 spoilage costs are {spoilage:.1}x higher than Metro (₹{:.2} vs ₹{:.2})",
                tier3.avg_spoilage_cost, metro.avg_spoilage_cost
            ),
        },
        Insight {
            title: "Growth Potential",
            text: format!(
                "{} customers in Tier 2/3 represent untapped revenue potential",
                format_thousands(untapped)
            ),
        },
    ]
}

pub const RECOMMENDATIONS: [Recommendation; 7] = [
    Recommendation {
        heading: "1. Optimize Last-Mile Logistics",
        actions: &[
            "Establish micro-fulfillment centers in Tier 2/3 city clusters to reduce delivery distances",
            "Partner with local logistics providers familiar with regional terrain",
            "Implement hub-and-spoke distribution model for better cost efficiency",
        ],
    },
    Recommendation {
        heading: "2. Improve Inventory Management",
        actions: &[
            "Deploy predictive analytics for demand forecasting in smaller markets",
            "Reduce perishable inventory in Tier 3 stores (focus on non-perishables initially)",
            "Implement FIFO (First-In-First-Out) strictly for fresh produce",
        ],
    },
    Recommendation {
        heading: "3. Tailor Product Assortment",
        actions: &[
            "Focus on high-margin, non-perishable categories for Tier 3 (Groceries, Home Care)",
            "Gradually introduce premium products based on customer digital literacy scores",
            "Create region-specific bundles (e.g., festive packs, local preferences)",
        ],
    },
    Recommendation {
        heading: "4. Enhance Customer Retention",
        actions: &[
            "Launch loyalty programs with tier-based rewards",
            "Offer free delivery for repeat customers to boost retention in Tier 2/3",
            "Use targeted WhatsApp marketing (high penetration in Tier 2/3)",
        ],
    },
    Recommendation {
        heading: "5. Reduce Costs Through Technology",
        actions: &[
            "Deploy route optimization software to reduce delivery time and fuel costs",
            "Implement IoT sensors for cold chain monitoring to reduce spoilage",
            "Use AI chatbots for customer support to reduce operational overhead",
        ],
    },
    Recommendation {
        heading: "6. Payment Method Optimization",
        actions: &[
            "Incentivize UPI payments in Tier 3 (currently COD-heavy) to reduce collection costs",
            "Partner with fintech for Buy-Now-Pay-Later options to increase basket sizes",
            "Educate customers on digital payment benefits through in-app tutorials",
        ],
    },
    Recommendation {
        heading: "7. Dynamic Pricing Strategy",
        actions: &[
            "Implement location-based pricing to offset higher logistics costs",
            "Offer strategic discounts during off-peak seasons to move inventory",
            "Test subscription models (JioMart Plus) for guaranteed delivery slots",
        ],
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thousands_grouping() {
        assert_eq!(format_thousands(0), "0");
        assert_eq!(format_thousands(999), "999");
        assert_eq!(format_thousands(6_750), "6,750");
        assert_eq!(format_thousands(1_234_567), "1,234,567");
    }

    #[test]
    fn spoilage_ratio_zero_when_metro_has_none() {
        assert_eq!(spoilage_ratio(0.0, 12.5), 0.0);
        assert_eq!(spoilage_ratio(2.0, 5.0), 2.5);
    }

    #[test]
    fn recommendation_blocks_are_complete() {
        assert_eq!(RECOMMENDATIONS.len(), 7);
        assert!(RECOMMENDATIONS.iter().all(|r| r.actions.len() == 3));
    }
}
