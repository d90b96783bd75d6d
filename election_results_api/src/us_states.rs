//! U.S. states and the District of Columbia - names, postal abbreviations and the
//! spellings the results site uses that differ from the canonical name.

/// (name, postal abbreviation) for the 50 states and DC.
pub const US_STATES : [(&'static str, &'static str); 51] = [
    ("Alabama","AL"), ("Alaska","AK"), ("Arizona","AZ"), ("Arkansas","AR"), ("California","CA"),
    ("Colorado","CO"), ("Connecticut","CT"), ("Delaware","DE"), ("District of Columbia","DC"), ("Florida","FL"),
    ("Georgia","GA"), ("Hawaii","HI"), ("Idaho","ID"), ("Illinois","IL"), ("Indiana","IN"),
    ("Iowa","IA"), ("Kansas","KS"), ("Kentucky","KY"), ("Louisiana","LA"), ("Maine","ME"),
    ("Maryland","MD"), ("Massachusetts","MA"), ("Michigan","MI"), ("Minnesota","MN"), ("Mississippi","MS"),
    ("Missouri","MO"), ("Montana","MT"), ("Nebraska","NE"), ("Nevada","NV"), ("New Hampshire","NH"),
    ("New Jersey","NJ"), ("New Mexico","NM"), ("New York","NY"), ("North Carolina","NC"), ("North Dakota","ND"),
    ("Ohio","OH"), ("Oklahoma","OK"), ("Oregon","OR"), ("Pennsylvania","PA"), ("Rhode Island","RI"),
    ("South Carolina","SC"), ("South Dakota","SD"), ("Tennessee","TN"), ("Texas","TX"), ("Utah","UT"),
    ("Vermont","VT"), ("Virginia","VA"), ("Washington","WA"), ("West Virginia","WV"), ("Wisconsin","WI"),
    ("Wyoming","WY"),
];

/// Spellings seen on results pages, mapped to the canonical name. Stored as [name_key]s, so
/// "Washington, D.C." and "washington dc" are the same entry.
const NAME_VARIANTS : [(&'static str, &'static str); 6] = [
    ("washington dc","District of Columbia"),
    ("dc","District of Columbia"),
    ("dist of columbia","District of Columbia"),
    ("district of columbia (dc)","District of Columbia"),
    ("washington district of columbia","District of Columbia"),
    ("n carolina","North Carolina"),
];

/// The form names are compared in: lower case, no `.` or `,`, single spaces.
pub fn name_key(name:&str) -> String {
    name.chars()
        .filter(|c|*c!='.'&&*c!=',')
        .collect::<String>()
        .split_whitespace()
        .map(|w|w.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ")
}

/// The postal abbreviation for a canonical state name.
pub fn abbreviation_for(name:&str) -> Option<&'static str> {
    US_STATES.iter().find(|(n,_)|n.eq_ignore_ascii_case(name)).map(|(_,a)|*a)
}

/// The canonical name for a known variant spelling, if it is one.
pub fn canonical_variant(name:&str) -> Option<&'static str> {
    let key = name_key(name);
    NAME_VARIANTS.iter().find(|(v,_)|*v==key).map(|(_,n)|*n)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_abbreviations() {
        assert_eq!(Some("FL"),abbreviation_for("Florida"));
        assert_eq!(Some("DC"),abbreviation_for("district of columbia"));
        assert_eq!(None,abbreviation_for("Puerto Rico"));
        let mut abbreviations : Vec<_> = US_STATES.iter().map(|(_,a)|*a).collect();
        abbreviations.sort();
        abbreviations.dedup();
        assert_eq!(51,abbreviations.len());
    }

    #[test]
    fn test_name_key() {
        assert_eq!("washington dc",name_key(" Washington,  D.C. "));
        assert_eq!("new york",name_key("New\u{a0}York"));
        assert_eq!(name_key("St. Louis"),name_key("st louis"));
    }

    #[test]
    fn test_variants() {
        assert_eq!(Some("District of Columbia"),canonical_variant("Washington D.C."));
        assert_eq!(Some("District of Columbia"),canonical_variant("D.C."));
        assert_eq!(Some("District of Columbia"),canonical_variant("Washington, D.C."));
        assert_eq!(Some("District of Columbia"),canonical_variant("d.c"));
        assert_eq!(Some("North Carolina"),canonical_variant("N. Carolina"));
        assert_eq!(None,canonical_variant("Florida"));
    }
}
