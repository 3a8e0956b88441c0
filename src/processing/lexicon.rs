//! Static lexical tables: blacklist, skill dictionary, phrase library and
//! high-value category patterns.

use aho_corasick::{AhoCorasick, MatchKind};
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

/// Generic job-ad filler and stop words that are never keywords.
pub static BLACKLIST: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        // Generic job posting words
        "remote", "hybrid", "office", "work", "team", "culture", "apply", "application",
        "bonus", "salary", "benefits", "perks", "hiring", "career", "job", "position",
        "role", "opportunity", "opportunities", "company", "organization", "employer",
        "employee", "employees", "environment", "day", "days", "week", "world", "people",
        "responsibilities", "qualifications", "requirements", "about", "other",

        // Common verbs/actions (not skills)
        "looking", "seeking", "required", "preferred", "ability", "able",
        "experience", "years", "year", "etc", "including", "include", "includes", "new",
        "well", "based", "using", "within", "across", "strong", "excellent", "good",
        "ensure", "ensuring", "provide", "providing", "support", "supporting", "help",
        "helping", "develop", "developing", "build", "building", "create", "creating",
        "understand", "understanding", "knowledge", "skills", "skill", "candidate",
        "candidates", "applicant", "applicants", "must", "shall", "will", "ideally",
        "highly", "plus", "nice", "have", "having", "get", "getting", "make",
        "making", "take", "taking", "use", "used", "uses", "per", "via", "like", "want",
        "wants", "wanted", "join", "joining", "joined", "lead", "leading", "leverage",
        "communicator", "work with", "working", "e.g", "i.e",

        // Stop words
        "the", "and", "for", "with", "our", "you", "your", "this", "that", "these",
        "those", "are", "was", "were", "been", "being", "has", "had",
        "does", "did", "doing", "would", "should", "could", "may", "might", "can",
        "need", "needs", "from", "into", "over", "under",
        "after", "before", "between", "through", "during", "above", "below", "such",
        "each", "every", "both", "few", "more", "most", "some", "any", "all",
        "only", "own", "same", "than", "too", "very", "just", "also", "now", "here",
        "there", "then", "when", "where", "why", "how", "what", "which", "who", "whom",
        "not", "but", "they", "their", "them", "its", "who's", "who", "yes", "one",

        // Business buzzwords (not ATS keywords)
        "passionate", "dynamic", "innovative", "fast-paced", "collaborative", "driven",
        "motivated", "self-starter", "proactive", "detail-oriented", "results-driven",
        "team-player", "hands-on", "startup", "scale", "grow", "growth", "impact",
        "mission", "vision", "values", "diverse", "inclusive", "equal",
    ]
    .into_iter()
    .collect()
});

/// Known single-term skills. Drives de-clustering of run-together tokens.
pub static SKILL_DICTIONARY: &[&str] = &[
    // Languages
    "python", "java", "javascript", "typescript", "c++", "c#", "ruby", "golang", "rust",
    "scala", "kotlin", "swift", "php", "perl", "sql", "bash", "powershell", "html", "css",

    // Frameworks and runtimes
    "react", "angular", "vue", "node.js", "nodejs", "django", "flask", "spring", "rails",
    "laravel", "express", "next.js", "nextjs", "graphql", "fastapi",

    // Cloud and DevOps
    "aws", "azure", "gcp", "docker", "kubernetes", "terraform", "ansible", "jenkins",
    "devops", "linux", "microservices", "serverless", "cloudformation", "helm",

    // Data and ML
    "nosql", "mongodb", "postgresql", "mysql", "redis", "elasticsearch", "kafka", "spark",
    "hadoop", "tensorflow", "pytorch", "pandas", "numpy", "snowflake", "databricks",
    "airflow", "tableau", "looker", "analytics", "etl",

    // Tools and methodologies
    "git", "github", "gitlab", "jira", "confluence", "agile", "scrum", "kanban", "api",
    "excel", "figma",

    // SaaS, CRM and go-to-market
    "salesforce", "hubspot", "crm", "zendesk", "gainsight", "marketo", "intercom",
    "servicenow", "netsuite", "reporting", "forecasting", "onboarding", "renewals",
    "marketing", "seo", "prospecting", "negotiation", "budgeting",

    // Security
    "siem", "owasp", "splunk", "firewall", "encryption", "compliance", "gdpr", "hipaa",

    // Soft skills
    "leadership", "communication", "mentoring", "stakeholder",
];

/// Multi-word phrases that are high-value whenever they appear literally.
pub static PHRASE_LIBRARY: &[&str] = &[
    // Customer and account work
    "customer success manager", "customer success", "customer onboarding",
    "customer retention", "customer support", "customer service", "account management",
    "account executive", "client relationships", "quarterly business reviews",
    "net promoter score", "churn reduction", "renewal management",

    // Business and management
    "project management", "product management", "program management",
    "stakeholder management", "change management", "risk management",
    "vendor management", "business development", "lead generation",
    "sales operations", "revenue operations", "pipeline management",
    "cross-functional collaboration", "strategic planning", "financial modeling",
    "supply chain", "data-driven decision making",

    // Engineering
    "machine learning", "deep learning", "natural language processing",
    "computer vision", "data analysis", "data science", "data engineering",
    "data visualization", "data pipelines", "cloud computing", "distributed systems",
    "system design", "continuous integration", "continuous delivery",
    "test automation", "unit testing", "version control", "rest apis",
    "infrastructure as code", "site reliability engineering", "agile methodologies",
    "scrum master", "technical support", "user experience", "user research",

    // Security
    "security awareness", "penetration testing", "vulnerability management",
    "incident response", "identity and access management", "threat modeling",

    // Marketing
    "digital marketing", "content marketing", "email marketing", "social media",
    "search engine optimization", "marketing automation",

    // Soft skills
    "problem solving", "critical thinking", "attention to detail",
    "written communication", "verbal communication", "time management",
    "public speaking", "relationship building",
];

/// A curated technical category with its matching pattern.
pub struct HighValueCategory {
    pub name: &'static str,
    pub regex: Regex,
}

fn category(name: &'static str, pattern: &str) -> HighValueCategory {
    HighValueCategory {
        name,
        regex: Regex::new(pattern).expect("Invalid high-value pattern"),
    }
}

/// Technical categories whose matches are always ranked as high-value.
pub static HIGH_VALUE_PATTERNS: LazyLock<Vec<HighValueCategory>> = LazyLock::new(|| {
    vec![
        category(
            "languages",
            r"(?i)\b(?:c\+\+|c#)|\b(?:python|java|javascript|typescript|ruby|golang|rust|scala|kotlin|swift|php|perl)\b",
        ),
        category(
            "frameworks",
            r"(?i)\b(?:react|angular|vue|node\.?js|django|flask|spring|rails|laravel|express|next\.?js|nuxt|fastapi|asp\.net)\b",
        ),
        category(
            "cloud_devops",
            r"(?i)\b(?:aws|azure|gcp|docker|kubernetes|k8s|terraform|ansible|jenkins|ci/cd|devops|linux|serverless|helm)\b",
        ),
        category(
            "data_ml",
            r"(?i)\b(?:sql|nosql|mongodb|postgresql|mysql|redis|elasticsearch|kafka|spark|hadoop|tensorflow|pytorch|scikit-learn|pandas|numpy|snowflake|databricks|airflow|etl|llms?)\b",
        ),
        category(
            "saas_crm",
            r"(?i)\b(?:salesforce|hubspot|crm|zendesk|intercom|gainsight|marketo|pardot|salesloft|servicenow|netsuite|tableau|looker|power\s?bi|excel)\b",
        ),
        category(
            "security",
            r"(?i)\b(?:siem|soc\s?2|iso\s?27001|nist|gdpr|hipaa|pci[\s-]?dss|owasp|iam|sso|oauth|zero\s+trust|splunk|crowdstrike|firewalls?|encryption)\b",
        ),
        category(
            "tools_methods",
            r"(?i)\b(?:git|github|gitlab|jira|confluence|agile|scrum|kanban|rest|graphql|api|apis|microservices)\b",
        ),
    ]
});

/// Skill dictionary sorted longest entry first, used for greedy de-clustering.
pub static SKILLS_LONGEST_FIRST: LazyLock<Vec<&'static str>> = LazyLock::new(|| {
    let mut skills = SKILL_DICTIONARY.to_vec();
    skills.sort_by(|a, b| b.len().cmp(&a.len()));
    skills
});

/// Phrase library sorted longest entry first so specific phrases win ties.
pub static PHRASES_LONGEST_FIRST: LazyLock<Vec<&'static str>> = LazyLock::new(|| {
    let mut phrases = PHRASE_LIBRARY.to_vec();
    phrases.sort_by(|a, b| b.len().cmp(&a.len()));
    phrases
});

/// Overlapping matcher over dictionary skills of at least four characters.
pub static LONG_SKILL_MATCHER: LazyLock<(AhoCorasick, Vec<&'static str>)> = LazyLock::new(|| {
    let skills: Vec<&'static str> = SKILL_DICTIONARY
        .iter()
        .copied()
        .filter(|s| s.len() >= 4)
        .collect();
    let matcher = AhoCorasick::builder()
        .ascii_case_insensitive(true)
        .match_kind(MatchKind::Standard)
        .build(&skills)
        .expect("Failed to build skill matcher");
    (matcher, skills)
});

pub fn is_blacklisted(normalized: &str) -> bool {
    BLACKLIST.contains(normalized)
}

pub fn is_dictionary_skill(normalized: &str) -> bool {
    SKILL_DICTIONARY.contains(&normalized)
}

pub fn is_library_phrase(normalized: &str) -> bool {
    PHRASE_LIBRARY.contains(&normalized)
}

/// True when any high-value category pattern matches inside `text`.
pub fn matches_high_value_pattern(text: &str) -> bool {
    HIGH_VALUE_PATTERNS.iter().any(|c| c.regex.is_match(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tables_are_lowercase() {
        for skill in SKILL_DICTIONARY {
            assert_eq!(*skill, skill.to_lowercase());
        }
        for phrase in PHRASE_LIBRARY {
            assert_eq!(*phrase, phrase.to_lowercase());
            assert!(phrase.contains(' '));
        }
    }

    #[test]
    fn test_longest_first_ordering() {
        assert!(SKILLS_LONGEST_FIRST
            .windows(2)
            .all(|w| w[0].len() >= w[1].len()));

        let long = PHRASES_LONGEST_FIRST
            .iter()
            .position(|p| *p == "customer success manager")
            .unwrap();
        let short = PHRASES_LONGEST_FIRST
            .iter()
            .position(|p| *p == "customer success")
            .unwrap();
        assert!(long < short);
    }

    #[test]
    fn test_high_value_patterns() {
        assert!(matches_high_value_pattern("python"));
        assert!(matches_high_value_pattern("c++ developer"));
        assert!(matches_high_value_pattern("node.js"));
        assert!(matches_high_value_pattern("salesforce"));
        assert!(!matches_high_value_pattern("javascriptx"));
        assert!(!matches_high_value_pattern("gardening"));
    }

    #[test]
    fn test_high_value_matches_are_never_tiny() {
        let text = "r go c++ c# aws k8s sql sso iam api";
        for category in HIGH_VALUE_PATTERNS.iter() {
            for m in category.regex.find_iter(text) {
                assert!(m.as_str().len() >= 2, "{} matched {}", category.name, m.as_str());
            }
        }
        assert!(!matches_high_value_pattern("r go"));
    }
}
