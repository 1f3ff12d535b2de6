//! Static catalogs
//!
//! Immutable, process-wide lookup tables: the eight organizational pattern
//! codes, per-metric descriptions, and the known tool-error signatures.
//! Read-only after process start, no synchronization needed.

/// One organizational pattern the analysis tool can detect.
#[derive(Debug, Clone, Copy)]
pub struct PatternSpec {
    /// Column code used in the tool's pattern output file.
    pub code: &'static str,
    /// Full display name.
    pub name: &'static str,
    /// Static descriptive text.
    pub description: &'static str,
}

/// The eight known patterns, in catalog order.
pub static PATTERNS: [PatternSpec; 8] = [
    PatternSpec {
        code: "IC",
        name: "Informal Community (IC)",
        description: "Usually sets of people part of an organization, with a common interest, often closely dependent on their practice. Informal interactions, usually across unbound distances.",
    },
    PatternSpec {
        code: "CoP",
        name: "Community of Practice (CoP)",
        description: "Groups of people sharing a concern, a set of problems, or a passion about a topic, who deepen their knowledge and expertise in this area by interacting frequently in the same geolocation.",
    },
    PatternSpec {
        code: "FN",
        name: "Formal Network (FN)",
        description: "Members are rigorously selected and prescribed by management (often in the form of FG), directed according to corporate strategy and mission.",
    },
    PatternSpec {
        code: "SN",
        name: "Social Network (SN)",
        description: "SNs can be seen as a supertype for all OSSs. To identify an SN, it is sufficient to split the structure of organizational patterns into macrostructure and microstructure.",
    },
    PatternSpec {
        code: "IN",
        name: "Informal Network (IN)",
        description: "Looser networks of ties between individuals that happen to come in contact in the same context. Their driving force is the strength of the ties between members.",
    },
    PatternSpec {
        code: "NoP",
        name: "Network of Practice (NoP)",
        description: "A networked system of communication and collaboration connecting CoPs. Anyone can join. They span geographical and time distances alike.",
    },
    PatternSpec {
        code: "FG",
        name: "Formal Group (FG)",
        description: "People grouped by corporations to act on (or by means of) them. Each group has an organizational goal, called mission. Compared to FN, no reliance on networking technologies, local in nature.",
    },
    PatternSpec {
        code: "PT",
        name: "Project Team (PT)",
        description: "People with complementary skills who work together to achieve a common purpose for which they are accountable. Enforced by their organization and follow specific strategies or organizational guidelines.",
    },
];

/// Known failure signatures the analysis tool reports via free-text
/// diagnostics, mapped to stable user-facing messages.
///
/// A slice of pairs rather than a map: matching walks the entries in
/// declaration order and the first case-insensitive substring hit wins.
pub static KNOWN_TOOL_ERRORS: [(&str, &str); 5] = [
    (
        "There must be at least 100 commits",
        "Invalid Repository: There must be at least 100 commits!",
    ),
    (
        "There must be at least 2 members",
        "Invalid Repository: Not enough members (min. 2)!",
    ),
    (
        "There must be at least 1 milestone",
        "Invalid Repository: No milestones found (min. 1)!",
    ),
    (
        "Geographical information is not enough",
        "Invalid Repository: Insufficient geographical data!",
    ),
    (
        "Invalid repository",
        "Invalid Repository: General validation failed!",
    ),
];

static DISPERSION_METRICS: [(&str, &str); 3] = [
    (
        "geo_distance_variance",
        "Variance in the geographic locations of contributors, indicating global distribution.",
    ),
    (
        "avg_geo_distance",
        "Average geographic distance between contributors, in kilometers.",
    ),
    (
        "cultural_distance_variance",
        "Variance in cultural values among contributors based on national culture metrics.",
    ),
];

static ENGAGEMENT_METRICS: [(&str, &str); 7] = [
    ("m_comment_per_pr", "Mean number of comments per pull request."),
    ("mm_comment_dist", "Median monthly number of comments per member."),
    (
        "m_watchers",
        "Mean number of watchers, indicating general interest in the repository.",
    ),
    (
        "m_stargazers",
        "Mean number of stargazers, showing popularity or appreciation.",
    ),
    ("m_active", "Number of active members (committed in last 30 days)."),
    ("mm_commit_dist", "Median number of commits per member per month."),
    (
        "mm_filecollab_dist",
        "Median number of collaborators per file per month.",
    ),
];

static FORMALITY_METRICS: [(&str, &str); 3] = [
    (
        "m_membership_type",
        "Average member role score (e.g., contributor = 1, collaborator = 2).",
    ),
    ("milestones", "Total number of milestones set in the project."),
    ("lifetime", "Project age in days from first to last commit."),
];

static LONGEVITY_METRICS: [(&str, &str); 1] = [(
    "longevity",
    "Average number of days active contributors have been part of the project.",
)];

static STRUCTURE_METRICS: [(&str, &str); 3] = [
    (
        "repo_connections",
        "Indicates if contributors work together on the same repositories.",
    ),
    (
        "follow_connections",
        "Indicates if contributors follow each other on GitHub.",
    ),
    (
        "pr_connections",
        "Indicates if contributors interact through pull request comments.",
    ),
];

/// Static description for a metric key within a section.
///
/// Unknown sections and unknown keys yield an empty description, not an
/// error.
pub fn metric_description(section: &str, key: &str) -> &'static str {
    let table: &[(&str, &str)] = match section {
        "dispersion" => &DISPERSION_METRICS,
        "engagement" => &ENGAGEMENT_METRICS,
        "formality" => &FORMALITY_METRICS,
        "longevity" => &LONGEVITY_METRICS,
        "structure" => &STRUCTURE_METRICS,
        _ => return "",
    };

    table
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, description)| *description)
        .unwrap_or("")
}

/// Looks up a pattern by its column code.
pub fn pattern_by_code(code: &str) -> Option<&'static PatternSpec> {
    PATTERNS.iter().find(|p| p.code == code)
}
