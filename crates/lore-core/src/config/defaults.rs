// Single source of truth for all default values.

// --- Extraction ---
pub const DEFAULT_ENABLE_GAZETTEER: bool = true;
pub const DEFAULT_BASELINE_CONFIDENCE: f64 = 0.8;
pub const DEFAULT_CANDIDATE_CONFIDENCE: f64 = 0.5;
pub const DEFAULT_MIN_CANDIDATE_CHARS: usize = 3;
pub const DEFAULT_MAX_GAZETTEER_TERMS: usize = 5_000;
pub const DEFAULT_MAX_PHRASE_TOKENS: usize = 4;
pub const DEFAULT_CANDIDATE_STOPWORDS: &[&str] = &[
    "El", "La", "Los", "Las", "Lo", "Un", "Una", "Unos", "Unas", "Yo", "Tú", "Él", "Ella",
    "Usted", "Dios", "The", "A", "An", "I",
];

// --- Resolution ---
pub const DEFAULT_REVIEW_THRESHOLD: f64 = 0.6;
pub const DEFAULT_EXACT_ALIAS_CONFIDENCE: f64 = 1.0;
pub const DEFAULT_SUBSET_CONFIDENCE: f64 = 0.8;
pub const DEFAULT_SUPERSET_CONFIDENCE: f64 = 0.75;
pub const DEFAULT_NEAR_NAME_PENALTY: f64 = 0.1;
pub const DEFAULT_CROSS_KIND_PENALTY: f64 = 0.8;

// --- Temporal ---
pub const DEFAULT_MAX_AGE: u32 = 130;
pub const DEFAULT_MIN_YEAR: i32 = 1000;
pub const DEFAULT_MAX_YEAR: i32 = 2999;
pub const DEFAULT_LIFESPAN_YEARS: u32 = 130;
pub const DEFAULT_BIRTH_YEAR_MAX_SPREAD: u32 = 3;

// --- Consistency ---
pub const DEFAULT_HIGH_CONFIDENCE: f64 = 0.8;
pub const DEFAULT_AGE_TOLERANCE_YEARS: u32 = 1;
pub const DEFAULT_IMMUTABLE_ATTRIBUTES: &[&str] =
    &["eye_color", "birthplace", "birth_year", "blood_type", "skin"];
pub const DEFAULT_CONTINUOUS_ATTRIBUTES: &[&str] = &["age"];
pub const DEFAULT_SYNONYM_GROUPS: &[&[&str]] = &[
    &["castaño", "marrón", "pardo", "chocolate", "castaños", "marrones"],
    &["negro", "azabache", "negros"],
    &["rubio", "dorado", "rubios"],
    &["pelirrojo", "rojo", "cobrizo", "bermejo"],
    &["gris", "plateado", "ceniza", "grises"],
    &["miel", "ámbar"],
    &["verde", "verdes"],
    &["azul", "azules"],
    &["canoso", "cano", "canas", "entrecano"],
];

// --- Index ---
pub const DEFAULT_CLUSTER_MIN_SIZE: usize = 3;
pub const DEFAULT_MAX_CLUSTERS: usize = 3;

// --- Pipeline ---
pub const DEFAULT_PARALLELISM: usize = 4;

// --- Observability ---
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_JSON_LOGS: bool = false;
