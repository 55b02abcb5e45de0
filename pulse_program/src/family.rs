use std::fmt;
use std::sync::OnceLock;
use regex::Regex;

/// indexed parameter families a pulse program can reference, e.g. `p1`, `sp3`, `cnst12`
#[derive(Clone,Copy,Debug,PartialEq,Eq,PartialOrd,Ord,Hash)]
pub enum Family {
    P,
    Sp,
    Pl,
    Gp,
    D,
    Cnst,
    Cpd,
    L,
    Pcpd,
}

impl Family {
    pub const ALL:[Family;9] = [
        Family::P,
        Family::Sp,
        Family::Pl,
        Family::Gp,
        Family::D,
        Family::Cnst,
        Family::Cpd,
        Family::L,
        Family::Pcpd,
    ];

    pub fn tag(&self) -> &'static str {
        match self {
            Family::P => "p",
            Family::Sp => "sp",
            Family::Pl => "pl",
            Family::Gp => "gp",
            Family::D => "d",
            Family::Cnst => "cnst",
            Family::Cpd => "cpd",
            Family::L => "l",
            Family::Pcpd => "pcpd",
        }
    }

    // the leading word boundary keeps `p` out of `sp1`/`gp1`, `l` out of `pl1`,
    // `d` out of `cpd2` and `cpd` out of `pcpd2`
    fn pattern(&self) -> &'static str {
        match self {
            Family::P => r"\bp(\d+)",
            Family::Sp => r"\bsp(\d+)",
            Family::Pl => r"\bpl(\d+)",
            Family::Gp => r"\bgp(\d+)",
            Family::D => r"\bd(\d+)",
            Family::Cnst => r"\bcnst(\d+)",
            Family::Cpd => r"\bcpds?(\d+)",
            Family::L => r"\bl(\d+)",
            Family::Pcpd => r"\bpcpd(\d+)",
        }
    }

    fn regex(&self) -> &'static Regex {
        static PATTERNS:OnceLock<Vec<Regex>> = OnceLock::new();
        let patterns = PATTERNS.get_or_init(|| {
            Family::ALL.iter().map(|f| Regex::new(f.pattern()).expect("invalid regex")).collect()
        });
        &patterns[*self as usize]
    }

    /// every index this family references in `text`, in order of appearance
    pub fn indices(&self,text:&str) -> Vec<u32> {
        self.regex().captures_iter(text)
            .filter_map(|caps| caps.get(1))
            .filter_map(|m| m.as_str().parse().ok())
            .collect()
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn families_do_not_overlap(){
        let line = "  (p11:sp1 ph2):f1 pl12:f2 cpd2:f2 pcpd3 p16:gp1 d16 l4";
        assert_eq!(Family::P.indices(line),vec![11,16]);
        assert_eq!(Family::Sp.indices(line),vec![1]);
        assert_eq!(Family::Pl.indices(line),vec![12]);
        assert_eq!(Family::Gp.indices(line),vec![1]);
        assert_eq!(Family::D.indices(line),vec![16]);
        assert_eq!(Family::Cpd.indices(line),vec![2]);
        assert_eq!(Family::Pcpd.indices(line),vec![3]);
        assert_eq!(Family::L.indices(line),vec![4]);
    }

    #[test]
    fn cpds_variant_and_line_start(){
        assert_eq!(Family::Cpd.indices("cpds2:f2"),vec![2]);
        assert_eq!(Family::D.indices("d1 pl1:f1"),vec![1]);
        assert_eq!(Family::P.indices("p1*0.5 step1"),vec![1]);
    }

    #[test]
    fn displayed_by_tag(){
        assert_eq!(Family::Pcpd.to_string(),"pcpd");
        assert_eq!(format!("{} {}",Family::Cnst,4),"cnst 4");
    }
}
