use pretty_assertions::assert_eq;

use reportgen_core::concepts::{extract_concepts, Domain};
use reportgen_core::planner::{base_chapter_count, plan_chapters};
use reportgen_core::tier::LengthTier;

#[test]
fn campus_ecommerce_portal_is_planned_as_ecommerce() {
    let concepts = extract_concepts(
        "Campus E-Commerce Portal",
        "A React.js and Node.js based e-commerce platform with payment and authentication features",
    );

    assert_eq!(concepts.domain, Domain::ECommerce);
    assert!(concepts.technologies.contains(&"React.js".to_string()));
    assert!(concepts.technologies.contains(&"Node.js".to_string()));
    assert!(concepts.features.contains(&"user authentication".to_string()));
    assert!(concepts.features.contains(&"payment processing".to_string()));
    // "React.js" must not also read as Java.
    assert_eq!(concepts.technologies, vec!["React.js", "Node.js"]);
    assert_eq!(
        concepts.features,
        vec!["user authentication", "payment processing"]
    );

    let plan = plan_chapters(concepts.domain, "Campus E-Commerce Portal", 15_000);
    assert_eq!(plan.len(), 7);
    assert_eq!(
        plan.chapters[0].title,
        "INTRODUCTION TO CAMPUS E-COMMERCE PORTAL SYSTEM"
    );
    assert_eq!(
        plan.chapters[0].heading(),
        "CHAPTER 1: INTRODUCTION TO CAMPUS E-COMMERCE PORTAL SYSTEM"
    );
}

#[test]
fn extraction_is_deterministic() {
    let title = "Smart Shopping Assistant";
    let description = "Python machine learning recommendation engine with an analytics dashboard";
    assert_eq!(
        extract_concepts(title, description),
        extract_concepts(title, description)
    );
}

#[test]
fn technologies_keep_table_order() {
    let concepts = extract_concepts(
        "Inventory Tracker",
        "Uses MongoDB, a REST API and Python scripts",
    );
    assert_eq!(
        concepts.technologies,
        vec![
            "Python".to_string(),
            "Database Systems".to_string(),
            "REST APIs".to_string()
        ]
    );
}

#[test]
fn domain_chain_prefers_ecommerce_then_ai_then_web() {
    // "shopping" in the description wins over an AI title.
    let ecommerce = extract_concepts("AI Store", "online shopping");
    assert_eq!(ecommerce.domain, Domain::ECommerce);

    let ai = extract_concepts("Crop Yield Predictor", "machine learning on sensor data");
    assert_eq!(ai.domain, Domain::ArtificialIntelligence);

    let web = extract_concepts("Web Portfolio", "static site");
    assert_eq!(web.domain, Domain::WebDevelopment);

    let software = extract_concepts("Compiler Toolkit", "parses source files");
    assert_eq!(software.domain, Domain::SoftwareDevelopment);
}

#[test]
fn chapter_count_follows_length_tier_for_every_domain() {
    let domains = [
        Domain::ECommerce,
        Domain::ArtificialIntelligence,
        Domain::WebDevelopment,
        Domain::SoftwareDevelopment,
    ];
    for domain in domains {
        let base = base_chapter_count(domain);
        assert_eq!(plan_chapters(domain, "X", 10_000).len(), base);
        assert_eq!(plan_chapters(domain, "X", 19_999).len(), base);
        assert_eq!(plan_chapters(domain, "X", 20_000).len(), base + 1);
        assert_eq!(plan_chapters(domain, "X", 24_999).len(), base + 1);
        assert_eq!(plan_chapters(domain, "X", 25_000).len(), base + 3);
    }
    assert_eq!(base_chapter_count(Domain::SoftwareDevelopment), 6);
    assert_eq!(base_chapter_count(Domain::WebDevelopment), 7);
}

#[test]
fn comprehensive_plan_appends_closing_chapters() {
    let plan = plan_chapters(Domain::SoftwareDevelopment, "Library Tracker", 27_000);
    assert_eq!(plan.tier, LengthTier::Comprehensive);
    assert!(plan.len() >= 9);
    let titles: Vec<&str> = plan.chapters.iter().map(|c| c.title.as_str()).collect();
    assert_eq!(
        &titles[titles.len() - 3..],
        &[
            "ADVANCED FEATURES AND SYSTEM ENHANCEMENTS",
            "COMPARATIVE ANALYSIS AND BENCHMARKING STUDIES",
            "FUTURE SCOPE, RECOMMENDATIONS AND CONCLUSIONS",
        ]
    );
    let numbers: Vec<usize> = plan.chapters.iter().map(|c| c.number).collect();
    assert_eq!(numbers, (1..=plan.len()).collect::<Vec<_>>());
}
