/*
    The instrument hands list-valued parameters (SPNAM, GPNAM, CPDPRG ...) back as a flat
    string of bracketed entries: "<> <> <Gaus1.1000> <> <Sinc1.1000>"
 */

/// split an array string into its entries. Text outside brackets is ignored and an
/// unterminated trailing entry is dropped.
pub fn decode(array_string:&str) -> Vec<String> {
    let mut entries = Vec::<String>::new();
    let mut current = String::new();
    let mut capturing = false;
    for c in array_string.chars() {
        match c {
            '<' => {
                capturing = true;
            }
            '>' => {
                entries.push(std::mem::take(&mut current));
                capturing = false;
            }
            _ if capturing => current.push(c),
            _ => {}
        }
    }
    entries
}

/// inverse of `decode` for entries without '<' or '>'
pub fn encode<S:AsRef<str>>(entries:&[S]) -> String {
    entries.iter().map(|e| format!("<{}>",e.as_ref())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_keeps_empty_entries(){
        assert_eq!(decode("<><><3.5><><10>"),vec!["","","3.5","","10"]);
        assert_eq!(decode("<> <> <garp> <mlev>"),vec!["","","garp","mlev"]);
    }

    #[test]
    fn encode_matches_instrument_format(){
        assert_eq!(encode(&["","","3.5","","10"]),"<><><3.5><><10>");
        assert_eq!(encode::<&str>(&[]),"");
    }

    #[test]
    fn round_trip(){
        let cases:Vec<Vec<String>> = vec![
            vec![],
            vec![String::new()],
            vec!["Crp60,0.5,20.1".into(),"".into(),"Gaus1.1000".into()],
            vec!["a b".into(),"  ".into(),"=;".into()],
        ];
        for entries in cases {
            assert_eq!(decode(&encode(&entries)),entries);
        }
    }

    #[test]
    fn unterminated_tail_is_dropped(){
        assert_eq!(decode("<a><b"),vec!["a"]);
        assert_eq!(decode("garbage"),Vec::<String>::new());
        // a second '<' restarts nothing, capture simply continues
        assert_eq!(decode("<a<b>"),vec!["ab"]);
    }
}
