//! Fixed upstream endpoints, all keyed to one profile identity.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    CodeforcesProfile,
    CodeforcesStatus,
    CodeforcesRating,
    CodeChef,
    LeetCode,
    GeeksForGeeks,
}

impl Endpoint {
    /// Every endpoint, in fan-out order.
    pub const ALL: [Endpoint; 6] = [
        Endpoint::CodeforcesProfile,
        Endpoint::CodeforcesStatus,
        Endpoint::CodeforcesRating,
        Endpoint::CodeChef,
        Endpoint::LeetCode,
        Endpoint::GeeksForGeeks,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Endpoint::CodeforcesProfile => "codeforces",
            Endpoint::CodeforcesStatus => "codeforcesStatus",
            Endpoint::CodeforcesRating => "codeforcesRating",
            Endpoint::CodeChef => "codechef",
            Endpoint::LeetCode => "leetcode",
            Endpoint::GeeksForGeeks => "geeksforgeeks",
        }
    }

    pub fn url(self) -> &'static str {
        match self {
            Endpoint::CodeforcesProfile => "https://codeforces.com/api/user.info?handles=souvik_jana_",
            Endpoint::CodeforcesStatus => "https://codeforces.com/api/user.status?handle=souvik_jana_",
            Endpoint::CodeforcesRating => "https://codeforces.com/api/user.rating?handle=souvik_jana_",
            Endpoint::CodeChef => "https://codechef-api.vercel.app/handle/sjana",
            Endpoint::LeetCode => "https://alfa-leetcode-api.onrender.com/souvikjana/profile",
            Endpoint::GeeksForGeeks => "https://geeks-for-geeks-stats-api.vercel.app/souvikjanaboss",
        }
    }
}
