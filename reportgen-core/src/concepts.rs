//! Keyword-driven inference of the project's domain, technologies and features.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Subject area a project is filed under. Selects the chapter template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Domain {
    #[serde(rename = "e-commerce")]
    ECommerce,
    #[serde(rename = "artificial intelligence")]
    ArtificialIntelligence,
    #[serde(rename = "web development")]
    WebDevelopment,
    #[serde(rename = "software development")]
    SoftwareDevelopment,
}

impl Domain {
    pub fn as_str(self) -> &'static str {
        match self {
            Domain::ECommerce => "e-commerce",
            Domain::ArtificialIntelligence => "artificial intelligence",
            Domain::WebDevelopment => "web development",
            Domain::SoftwareDevelopment => "software development",
        }
    }

    fn challenges(self) -> [&'static str; 4] {
        match self {
            Domain::ECommerce => [
                "scalable product catalog",
                "secure payment processing",
                "inventory management",
                "user experience optimization",
            ],
            Domain::ArtificialIntelligence => [
                "data preprocessing",
                "model accuracy",
                "computational efficiency",
                "algorithm selection",
            ],
            Domain::WebDevelopment => [
                "responsive design",
                "cross-browser compatibility",
                "performance optimization",
                "user interface design",
            ],
            Domain::SoftwareDevelopment => [
                "system architecture",
                "performance optimization",
                "user requirements",
                "technical implementation",
            ],
        }
    }

    fn benefits(self) -> [&'static str; 4] {
        match self {
            Domain::ECommerce => [
                "increased sales conversion",
                "improved customer satisfaction",
                "streamlined operations",
                "enhanced security",
            ],
            Domain::ArtificialIntelligence => [
                "automated decision making",
                "predictive analytics",
                "improved accuracy",
                "intelligent automation",
            ],
            Domain::WebDevelopment => [
                "enhanced user experience",
                "improved accessibility",
                "better performance",
                "modern interface",
            ],
            Domain::SoftwareDevelopment => [
                "improved efficiency",
                "better user experience",
                "enhanced functionality",
                "reliable performance",
            ],
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Metadata inferred from the free-text project title and description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectConcepts {
    pub technologies: Vec<String>,
    pub features: Vec<String>,
    pub domain: Domain,
    pub challenges: Vec<String>,
    pub benefits: Vec<String>,
}

/// Description substrings that each map to one technology label.
/// Table order is output order.
const TECHNOLOGY_KEYWORDS: &[(&[&str], &str)] = &[
    (&["react"], "React.js"),
    (&["node", "nodejs"], "Node.js"),
    (&["python"], "Python"),
    (&["java"], "Java"),
    (&["machine learning", "ml"], "Machine Learning"),
    (&["ai", "artificial intelligence"], "Artificial Intelligence"),
    (&["database", "mysql", "mongodb"], "Database Systems"),
    (&["api"], "REST APIs"),
    (&["blockchain"], "Blockchain"),
    (&["mobile", "android", "ios"], "Mobile Development"),
];

const FEATURE_KEYWORDS: &[(&[&str], &str)] = &[
    (&["authentication"], "user authentication"),
    (&["payment"], "payment processing"),
    (&["cart", "shopping"], "shopping cart functionality"),
    (&["recommendation"], "recommendation system"),
    (&["dashboard"], "admin dashboard"),
    (&["real-time"], "real-time processing"),
    (&["security"], "security measures"),
    (&["analytics"], "data analytics"),
];

fn matching_labels(haystack: &str, table: &[(&[&str], &str)]) -> Vec<String> {
    table
        .iter()
        .filter(|(needles, _)| needles.iter().any(|n| haystack.contains(n)))
        .map(|(_, label)| label.to_string())
        .collect()
}

fn detect_domain(title: &str, description: &str) -> Domain {
    if title.contains("e-commerce")
        || description.contains("e-commerce")
        || description.contains("shopping")
    {
        Domain::ECommerce
    } else if title.contains("ai")
        || title.contains("machine learning")
        || description.contains("machine learning")
    {
        Domain::ArtificialIntelligence
    } else if title.contains("web") || description.contains("web development") {
        Domain::WebDevelopment
    } else {
        Domain::SoftwareDevelopment
    }
}

/// Infers [`ProjectConcepts`] by case-insensitive substring matching.
///
/// Technologies and features are matched against the description only; the
/// domain chain also looks at the title. Plain substring tests, so short keys
/// like `ai` or `ml` also fire inside longer words.
pub fn extract_concepts(title: &str, description: &str) -> ProjectConcepts {
    let title = title.to_lowercase();
    let description = description.to_lowercase();

    let domain = detect_domain(&title, &description);

    ProjectConcepts {
        technologies: matching_labels(&description, TECHNOLOGY_KEYWORDS),
        features: matching_labels(&description, FEATURE_KEYWORDS),
        domain,
        challenges: domain.challenges().iter().map(|s| s.to_string()).collect(),
        benefits: domain.benefits().iter().map(|s| s.to_string()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_domain_has_no_matches() {
        let concepts = extract_concepts("Library Tracker", "Keeps track of books.");
        assert_eq!(concepts.domain, Domain::SoftwareDevelopment);
        assert!(concepts.technologies.is_empty());
        assert!(concepts.features.is_empty());
        assert_eq!(concepts.challenges.len(), 4);
    }

    #[test]
    fn substring_matching_is_not_word_bounded() {
        // "javascript" contains "java"; "email" contains "ai".
        let concepts = extract_concepts("Mailer", "A javascript email sender");
        assert_eq!(
            concepts.technologies,
            vec!["Java".to_string(), "Artificial Intelligence".to_string()]
        );
    }
}
