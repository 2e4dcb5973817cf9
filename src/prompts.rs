//! Instruction text sent to the model. Everything here is pure: identical
//! inputs always yield identical prompts.

use crate::models::EstimationRequest;

const PRICE_INSTRUCTIONS: &str = r#"YOUR RESEARCH PROCESS:
1. IDENTIFY the exact product (brand, model, specifications)
2. RESEARCH current market prices on:
   - OLX India (olx.in)
   - Quikr (quikr.com)
   - Amazon India used/renewed section
   - Flipkart refurbished section
   - Facebook Marketplace
   - Campus/Student marketplaces

3. FIND the original retail price (MRP/launch price)

4. ANALYZE depreciation factors:
   - Age/Year of purchase
   - Current condition (New/Like New/Good/Fair/Poor)
   - Brand reputation and demand
   - Market supply and demand
   - Season/timing factors

5. CALCULATE fair resale price based on:
   - Actual listings for similar products (average of 5-10 listings)
   - Condition-based depreciation from retail price
   - Market trends for this product category

CONDITION MULTIPLIERS (from original retail):
- New/Sealed: 85-95% of current retail
- Like New: 65-80% of current retail
- Good: 45-65% of current retail
- Fair: 30-45% of current retail
- Poor: 15-30% of current retail

CRITICAL RULES:
- DO NOT use generic/placeholder prices
- DO NOT make up prices without research
- RESEARCH the specific product model and brand
- USE actual market data from Indian marketplaces
- CONSIDER the exact specifications mentioned
- ACCOUNT for condition impact realistically
- KEEP reasoning SHORT and CONCISE (2-3 sentences max)

EXAMPLE RESEARCH:
Product: "HP Pavilion 15, Intel Core i5 11th Gen, 8GB RAM, 512GB SSD, Good condition"
Research:
- Original retail: ₹55,000-60,000 (2022 launch)
- OLX listings: ₹25,000-32,000 for similar specs
- Flipkart refurbished: ₹28,000-35,000
- Age: ~2 years, Good condition
- Fair price: ₹28,000 (average of current listings, considering condition)

Return ONLY valid JSON with SHORT reasoning (2-3 sentences):
{"predicted": <integer_price>, "lower": <integer_min>, "upper": <integer_max>, "confidence": "high", "reasoning": "<2-3 sentences: Original price, current market listings, final recommendation>"}

RESPOND NOW WITH PRICING FOR THE PRODUCT ABOVE:"#;

const IMAGE_SCHEMA: &str = r#"Respond with ONLY a flat JSON object (no nested objects) with these exact fields:

{
  "title": "Short product name (3-6 words)",
  "description": "Brief description (1-2 sentences, under 100 words)",
  "category": "One of: Books, Electronics, Furniture, Clothing, Sports, Stationery, Other",
  "condition": "One of: Like New, Good, Fair, Poor",
  "condition_reason": "Why this condition? (1 sentence)",
  "suggested_price_inr": 0,
  "price_reasoning": "Brief market research (2-3 sentences, check OLX/Amazon/Flipkart)",
  "is_legitimate": true,
  "legitimacy_score": 0,
  "flags": [],
  "flag_reason": "Explanation if flagged (1-2 sentences, empty string if clean)"
}

**Legitimacy Criteria**:
- LEGITIMATE: Actual product photos, real items being sold
- FLAG if: Stock images, memes, screenshots, inappropriate content, AI-generated, not a product, duplicate watermarks, celebrity photos, pornography, weapons, drugs

Respond ONLY with valid JSON. NO nested objects. Be concise."#;

/// Structured block describing the item, one `Label: value` per line.
pub fn product_info(request: &EstimationRequest) -> String {
    let mut info = format!(
        "Category: {}\nCondition: {}",
        request.category, request.condition_text
    );
    if let Some(title) = &request.title {
        info.push_str(&format!("\nProduct: {title}"));
    }
    if let Some(description) = &request.description {
        info.push_str(&format!("\nDetails: {description}"));
    }
    if let Some(price) = request.asking_price() {
        info.push_str(&format!("\nSeller's asking price: ₹{}", format_amount(price)));
    }
    info
}

pub fn price_prompt(request: &EstimationRequest) -> String {
    format!(
        "You are an expert price analyst for Indian marketplaces. Your job is to research and predict fair resale prices based on ACTUAL CURRENT MARKET DATA.\n\nPRODUCT TO ANALYZE:\n{info}\n\n{PRICE_INSTRUCTIONS}",
        info = product_info(request),
    )
}

pub fn image_prompt(image_count: usize) -> String {
    let (subject, joint_hint) = if image_count > 1 {
        (
            "these product images",
            format!(
                " Look at all {image_count} images together to get a complete view of the product."
            ),
        )
    } else {
        ("this product image", String::new())
    };
    format!("Analyze {subject} for a campus marketplace listing.{joint_hint}\n\n{IMAGE_SCHEMA}")
}

/// Whole rupees print without a decimal part.
fn format_amount(price: f64) -> String {
    if price.fract() == 0.0 {
        format!("{price:.0}")
    } else {
        format!("{price}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn laptop() -> EstimationRequest {
        EstimationRequest::new("Electronics", "Good").with_title("HP Pavilion 15")
    }

    #[test]
    fn product_block_skips_missing_fields() {
        let info = product_info(&laptop());
        assert_eq!(info, "Category: Electronics\nCondition: Good\nProduct: HP Pavilion 15");
    }

    #[test]
    fn condition_line_uses_the_seller_text() {
        let info = product_info(&EstimationRequest::new("Phones", " like new "));
        assert_eq!(info, "Category: Phones\nCondition: like new");
    }

    #[test]
    fn asking_price_is_included_when_positive() {
        let info = product_info(&laptop().with_description("8GB RAM").with_user_price(25000.0));
        assert!(info.ends_with("Details: 8GB RAM\nSeller's asking price: ₹25000"));
        let info = product_info(&laptop().with_user_price(0.0));
        assert!(!info.contains("asking price"));
    }

    #[test]
    fn price_prompt_is_deterministic_and_carries_bands() {
        let a = price_prompt(&laptop());
        let b = price_prompt(&laptop());
        assert_eq!(a, b);
        assert!(a.contains("Like New: 65-80% of current retail"));
        assert!(a.contains("Poor: 15-30% of current retail"));
        assert!(a.contains(r#""predicted": <integer_price>"#));
        assert!(a.contains("PRODUCT TO ANALYZE:\nCategory: Electronics"));
    }

    #[test]
    fn image_prompt_single_vs_many() {
        let one = image_prompt(1);
        assert!(one.starts_with("Analyze this product image for"));
        assert!(!one.contains("together"));

        let three = image_prompt(3);
        assert!(three.starts_with("Analyze these product images for"));
        assert!(three.contains("Look at all 3 images together"));
        assert!(three.contains("\"legitimacy_score\": 0"));
        assert!(three.contains("Stock images, memes, screenshots"));
    }
}
