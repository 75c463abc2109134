use crate::url::domain::is_same_origin;
use url::Url;

/// Score assigned to the site homepage
pub const HOMEPAGE_PRIORITY: u32 = 100;

/// Score for pages that match no entry of the table
pub const DEFAULT_PRIORITY: u32 = 40;

/// Path guesses seeded before any network activity
pub const SEED_PATHS: &[&str] = &[
    "/about",
    "/about-us",
    "/company",
    "/solutions",
    "/services",
    "/products",
    "/pricing",
    "/plans",
    "/case-studies",
    "/customers",
    "/success-stories",
    "/features",
    "/how-it-works",
];

/// Path-substring lookup table, checked top to bottom
const PRIORITY_TABLE: &[(&[&str], u32)] = &[
    (&["/about", "/company"], 90),
    (&["/services", "/solutions", "/products"], 85),
    (&["/pricing", "/plans"], 80),
    (&["/case-studies", "/customers", "/success"], 75),
    (&["/features", "/how-it-works"], 70),
    (&["/testimonials", "/reviews"], 65),
    (&["/resources", "/blog"], 60),
    (&["/contact"], 50),
];

/// Computes the priority score of a candidate URL relative to the homepage
///
/// # Examples
///
/// ```
/// use url::Url;
/// use site_intel::url::priority_score;
///
/// let home = Url::parse("https://acme.test/").unwrap();
/// let about = Url::parse("https://acme.test/about-us").unwrap();
/// assert_eq!(priority_score(&home, &home), 100);
/// assert_eq!(priority_score(&about, &home), 90);
/// ```
pub fn priority_score(url: &Url, homepage: &Url) -> u32 {
    if is_homepage(url, homepage) {
        return HOMEPAGE_PRIORITY;
    }

    let path = url.path().to_lowercase();

    PRIORITY_TABLE
        .iter()
        .find(|(needles, _)| needles.iter().any(|n| path.contains(n)))
        .map(|(_, score)| *score)
        .unwrap_or(DEFAULT_PRIORITY)
}

fn is_homepage(url: &Url, homepage: &Url) -> bool {
    if url == homepage {
        return true;
    }

    is_same_origin(url, homepage) && url.path() == "/" && url.query().is_none()
}
