//! Region normalization for Play Store lookups.
//!
//! Free-form country names from the UI are mapped to the 2-letter codes the
//! catalog's `gl` parameter expects. The table is built once; normalization
//! is a total function and never fails.

use lazy_static::lazy_static;
use std::collections::HashMap;

use crate::config::DEFAULT_REGION;

lazy_static! {
    /// Lowercased country name -> ISO 3166-1 alpha-2 code
    static ref COUNTRY_CODES: HashMap<&'static str, &'static str> = {
        let mut m = HashMap::new();
        m.insert("afghanistan", "AF");
        m.insert("aland islands", "AX");
        m.insert("albania", "AL");
        m.insert("algeria", "DZ");
        m.insert("american samoa", "AS");
        m.insert("andorra", "AD");
        m.insert("angola", "AO");
        m.insert("anguilla", "AI");
        m.insert("antarctica", "AQ");
        m.insert("antigua and barbuda", "AG");
        m.insert("argentina", "AR");
        m.insert("armenia", "AM");
        m.insert("aruba", "AW");
        m.insert("australia", "AU");
        m.insert("austria", "AT");
        m.insert("azerbaijan", "AZ");
        m.insert("bahamas", "BS");
        m.insert("bahrain", "BH");
        m.insert("bangladesh", "BD");
        m.insert("barbados", "BB");
        m.insert("belarus", "BY");
        m.insert("belgium", "BE");
        m.insert("belize", "BZ");
        m.insert("benin", "BJ");
        m.insert("bermuda", "BM");
        m.insert("bhutan", "BT");
        m.insert("bolivia", "BO");
        m.insert("bonaire, sint eustatius and saba", "BQ");
        m.insert("bosnia and herzegovina", "BA");
        m.insert("botswana", "BW");
        m.insert("bouvet island", "BV");
        m.insert("brazil", "BR");
        m.insert("british indian ocean territory", "IO");
        m.insert("brunei darussalam", "BN");
        m.insert("bulgaria", "BG");
        m.insert("burkina faso", "BF");
        m.insert("burundi", "BI");
        m.insert("cabo verde", "CV");
        m.insert("cambodia", "KH");
        m.insert("cameroon", "CM");
        m.insert("canada", "CA");
        m.insert("cayman islands", "KY");
        m.insert("central african republic", "CF");
        m.insert("chad", "TD");
        m.insert("chile", "CL");
        m.insert("china", "CN");
        m.insert("christmas island", "CX");
        m.insert("cocos (keeling) islands", "CC");
        m.insert("colombia", "CO");
        m.insert("comoros", "KM");
        m.insert("congo", "CG");
        m.insert("congo, democratic republic of the", "CD");
        m.insert("cook islands", "CK");
        m.insert("costa rica", "CR");
        m.insert("cote d'ivoire", "CI");
        m.insert("croatia", "HR");
        m.insert("cuba", "CU");
        m.insert("curacao", "CW");
        m.insert("cyprus", "CY");
        m.insert("czechia", "CZ");
        m.insert("denmark", "DK");
        m.insert("djibouti", "DJ");
        m.insert("dominica", "DM");
        m.insert("dominican republic", "DO");
        m.insert("ecuador", "EC");
        m.insert("egypt", "EG");
        m.insert("el salvador", "SV");
        m.insert("equatorial guinea", "GQ");
        m.insert("eritrea", "ER");
        m.insert("estonia", "EE");
        m.insert("eswatini", "SZ");
        m.insert("ethiopia", "ET");
        m.insert("falkland islands (malvinas)", "FK");
        m.insert("faroe islands", "FO");
        m.insert("fiji", "FJ");
        m.insert("finland", "FI");
        m.insert("france", "FR");
        m.insert("french guiana", "GF");
        m.insert("french polynesia", "PF");
        m.insert("french southern territories", "TF");
        m.insert("gabon", "GA");
        m.insert("gambia", "GM");
        m.insert("georgia", "GE");
        m.insert("germany", "DE");
        m.insert("ghana", "GH");
        m.insert("gibraltar", "GI");
        m.insert("greece", "GR");
        m.insert("greenland", "GL");
        m.insert("grenada", "GD");
        m.insert("guadeloupe", "GP");
        m.insert("guam", "GU");
        m.insert("guatemala", "GT");
        m.insert("guernsey", "GG");
        m.insert("guinea", "GN");
        m.insert("guinea-bissau", "GW");
        m.insert("guyana", "GY");
        m.insert("haiti", "HT");
        m.insert("heard island and mcdonald islands", "HM");
        m.insert("holy see", "VA");
        m.insert("honduras", "HN");
        m.insert("hong kong", "HK");
        m.insert("hungary", "HU");
        m.insert("iceland", "IS");
        m.insert("india", "IN");
        m.insert("indonesia", "ID");
        m.insert("iran", "IR");
        m.insert("iraq", "IQ");
        m.insert("ireland", "IE");
        m.insert("isle of man", "IM");
        m.insert("israel", "IL");
        m.insert("italy", "IT");
        m.insert("jamaica", "JM");
        m.insert("japan", "JP");
        m.insert("jersey", "JE");
        m.insert("jordan", "JO");
        m.insert("kazakhstan", "KZ");
        m.insert("kenya", "KE");
        m.insert("kiribati", "KI");
        m.insert("korea, democratic people's republic of", "KP");
        m.insert("korea, republic of", "KR");
        m.insert("south korea", "KR");
        m.insert("kuwait", "KW");
        m.insert("kyrgyzstan", "KG");
        m.insert("lao people's democratic republic", "LA");
        m.insert("latvia", "LV");
        m.insert("lebanon", "LB");
        m.insert("lesotho", "LS");
        m.insert("liberia", "LR");
        m.insert("libya", "LY");
        m.insert("liechtenstein", "LI");
        m.insert("lithuania", "LT");
        m.insert("luxembourg", "LU");
        m.insert("macao", "MO");
        m.insert("madagascar", "MG");
        m.insert("malawi", "MW");
        m.insert("malaysia", "MY");
        m.insert("maldives", "MV");
        m.insert("mali", "ML");
        m.insert("malta", "MT");
        m.insert("marshall islands", "MH");
        m.insert("martinique", "MQ");
        m.insert("mauritania", "MR");
        m.insert("mauritius", "MU");
        m.insert("mayotte", "YT");
        m.insert("mexico", "MX");
        m.insert("micronesia", "FM");
        m.insert("moldova", "MD");
        m.insert("monaco", "MC");
        m.insert("mongolia", "MN");
        m.insert("montenegro", "ME");
        m.insert("montserrat", "MS");
        m.insert("morocco", "MA");
        m.insert("mozambique", "MZ");
        m.insert("myanmar", "MM");
        m.insert("namibia", "NA");
        m.insert("nauru", "NR");
        m.insert("nepal", "NP");
        m.insert("netherlands", "NL");
        m.insert("new caledonia", "NC");
        m.insert("new zealand", "NZ");
        m.insert("nicaragua", "NI");
        m.insert("niger", "NE");
        m.insert("nigeria", "NG");
        m.insert("niue", "NU");
        m.insert("norfolk island", "NF");
        m.insert("northern mariana islands", "MP");
        m.insert("norway", "NO");
        m.insert("oman", "OM");
        m.insert("pakistan", "PK");
        m.insert("palau", "PW");
        m.insert("palestine, state of", "PS");
        m.insert("panama", "PA");
        m.insert("papua new guinea", "PG");
        m.insert("paraguay", "PY");
        m.insert("peru", "PE");
        m.insert("philippines", "PH");
        m.insert("pitcairn", "PN");
        m.insert("poland", "PL");
        m.insert("portugal", "PT");
        m.insert("puerto rico", "PR");
        m.insert("qatar", "QA");
        m.insert("reunion", "RE");
        m.insert("romania", "RO");
        m.insert("russian federation", "RU");
        m.insert("russia", "RU");
        m.insert("rwanda", "RW");
        m.insert("saint barthelemy", "BL");
        m.insert("saint helena, ascension and tristan da cunha", "SH");
        m.insert("saint kitts and nevis", "KN");
        m.insert("saint lucia", "LC");
        m.insert("saint martin (french part)", "MF");
        m.insert("saint pierre and miquelon", "PM");
        m.insert("saint vincent and the grenadines", "VC");
        m.insert("samoa", "WS");
        m.insert("san marino", "SM");
        m.insert("sao tome and principe", "ST");
        m.insert("saudi arabia", "SA");
        m.insert("senegal", "SN");
        m.insert("serbia", "RS");
        m.insert("seychelles", "SC");
        m.insert("sierra leone", "SL");
        m.insert("singapore", "SG");
        m.insert("sint maarten (dutch part)", "SX");
        m.insert("slovakia", "SK");
        m.insert("slovenia", "SI");
        m.insert("solomon islands", "SB");
        m.insert("somalia", "SO");
        m.insert("south africa", "ZA");
        m.insert("south georgia and the south sandwich islands", "GS");
        m.insert("south sudan", "SS");
        m.insert("spain", "ES");
        m.insert("sri lanka", "LK");
        m.insert("sudan", "SD");
        m.insert("suriname", "SR");
        m.insert("svalbard and jan mayen", "SJ");
        m.insert("swaziland", "SZ");
        m.insert("sweden", "SE");
        m.insert("switzerland", "CH");
        m.insert("syrian arab republic", "SY");
        m.insert("taiwan", "TW");
        m.insert("tajikistan", "TJ");
        m.insert("tanzania, united republic of", "TZ");
        m.insert("thailand", "TH");
        m.insert("timor-leste", "TL");
        m.insert("togo", "TG");
        m.insert("tokelau", "TK");
        m.insert("tonga", "TO");
        m.insert("trinidad and tobago", "TT");
        m.insert("tunisia", "TN");
        m.insert("turkey", "TR");
        m.insert("turkmenistan", "TM");
        m.insert("turks and caicos islands", "TC");
        m.insert("tuvalu", "TV");
        m.insert("uganda", "UG");
        m.insert("ukraine", "UA");
        m.insert("united arab emirates", "AE");
        m.insert("united kingdom", "GB");
        m.insert("uk", "GB");
        m.insert("united states", "US");
        m.insert("usa", "US");
        m.insert("united states minor outlying islands", "UM");
        m.insert("uruguay", "UY");
        m.insert("uzbekistan", "UZ");
        m.insert("vanuatu", "VU");
        m.insert("venezuela", "VE");
        m.insert("vietnam", "VN");
        m.insert("virgin islands, british", "VG");
        m.insert("virgin islands, u.s.", "VI");
        m.insert("wallis and futuna", "WF");
        m.insert("western sahara", "EH");
        m.insert("yemen", "YE");
        m.insert("zambia", "ZM");
        m.insert("zimbabwe", "ZW");
        m
    };
}

/// Translates a free-form country name to a 2-letter region code.
///
/// Empty input yields the default region. A 2-letter alphabetic input is
/// accepted as a code and uppercased without a table lookup. Unknown names
/// are passed through uppercased rather than rejected.
pub fn normalize_region(region_name: &str) -> String {
    let clean_name = region_name.trim().to_lowercase();

    if clean_name.is_empty() {
        return DEFAULT_REGION.to_string();
    }

    // Already a code?
    if clean_name.len() == 2 && clean_name.chars().all(|c| c.is_ascii_alphabetic()) {
        return clean_name.to_uppercase();
    }

    match COUNTRY_CODES.get(clean_name.as_str()) {
        Some(code) => (*code).to_string(),
        None => clean_name.to_uppercase(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_defaults() {
        assert_eq!(normalize_region(""), "US");
        assert_eq!(normalize_region("   "), "US");
    }

    #[test]
    fn test_two_letter_codes_pass_through() {
        assert_eq!(normalize_region("de"), "DE");
        assert_eq!(normalize_region("US"), "US");
        assert_eq!(normalize_region(" gb "), "GB");
        // Two letters are always taken as a code, even nonsense ones
        assert_eq!(normalize_region("zz"), "ZZ");
    }

    #[test]
    fn test_country_name_lookup() {
        assert_eq!(normalize_region("Germany"), "DE");
        assert_eq!(normalize_region("united kingdom"), "GB");
        assert_eq!(normalize_region("usa"), "US");
        assert_eq!(normalize_region("South Korea"), "KR");
        assert_eq!(normalize_region("  brazil  "), "BR");
    }

    #[test]
    fn test_unknown_name_passthrough() {
        assert_eq!(normalize_region("atlantis"), "ATLANTIS");
    }

    #[test]
    fn test_idempotent_on_codes() {
        for input in ["Germany", "fr", "south africa", "xx"] {
            let once = normalize_region(input);
            assert_eq!(normalize_region(&once), once);
        }
    }
}
