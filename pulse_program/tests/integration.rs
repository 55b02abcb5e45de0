use std::fs;
use pulse_program::{array_string, CalibrationEntry, ChannelCalibration, Family, ParseError, ProsolTable, PulseProgram, ScanMode};

const HSQC:&str = r#";hsqcetgp
;avance-version (12/01/11)
#include <Avance.incl>
#include <Grad.incl>
prosol relations=<triple>

"p2=p1*2"
"p4=p3*2"
"d4=1s/(cnst2*4)"
"d11=30m"

1 ze
  d11 pl12:f2
2 d1 do:f2
3 (p1 ph1)
  (p3 ph3):f2
  d4 pl2:f2
  (center (p2 ph2) (p4 ph6):f2 )
  p16:gp1
  d16 pl12:f2
  go=2 ph31 cpd2:f2
  d11 do:f2 mc #0 to 2 F1EA(calgrad(EA), caldel(d0, +in0))
exit

;pl1 : f1 channel - power level for pulse (default)
;gpnam1: SMSQ10.100
"#;

#[test]
fn located_in_the_second_candidate_directory(){
    let nmr = tempfile::tempdir().unwrap();
    fs::create_dir_all(nmr.path().join("lists/pp/user")).unwrap();
    fs::create_dir_all(nmr.path().join("lists/pp")).unwrap();
    utils::write_latin1(&nmr.path().join("lists/pp/hsqcetgp"),HSQC).unwrap();
    let dirs = vec!["lists/pp/user".to_string(),"lists/pp".to_string()];

    let pp = PulseProgram::locate("hsqcetgp",nmr.path(),&dirs,ScanMode::Parameters).unwrap();
    assert_eq!(pp.source().unwrap(),nmr.path().join("lists/pp/hsqcetgp"));
    assert_eq!(pp.lines().concat(),HSQC);

    let used = pp.used_parameters();
    assert_eq!(used.indices(Family::P),vec![1,3,16]);
    assert_eq!(used.indices(Family::Pl),vec![2,12]);
    assert_eq!(used.indices(Family::D),vec![0,1,16]);
    // cnst2 only feeds the quoted d4 assignment
    assert!(!used.contains(Family::Cnst));
    assert_eq!(used.indices(Family::Gp),vec![1]);
    assert_eq!(used.indices(Family::Cpd),vec![2]);
    assert!(!used.contains(Family::Sp));
    assert_eq!(pp.include_files(),&["Avance.incl".to_string(),"Grad.incl".to_string()]);
    assert_eq!(pp.prosol_files(),&["triple".to_string()]);
}

#[test]
fn missing_program_names_every_candidate(){
    let nmr = tempfile::tempdir().unwrap();
    let dirs = vec!["lists/pp/user".to_string(),"/opt/pp".to_string()];
    match PulseProgram::locate("zg30",nmr.path(),&dirs,ScanMode::Parameters) {
        Err(ParseError::NotFound{searched,..}) => {
            assert_eq!(searched.len(),2);
            assert_eq!(searched[0],nmr.path().join("lists/pp/user/zg30"));
            assert_eq!(searched[1],std::path::PathBuf::from("/opt/pp/zg30"));
        }
        other => panic!("expected not found, got {:?}",other)
    }
}

#[test]
fn calibration_path_end_to_end(){
    let dir = tempfile::tempdir().unwrap();
    let prosol = dir.path().join("triple");
    fs::write(&prosol,"P[1]=PW90;1\nPLW[1]=PL90;1\nP[3]=PW90;2\nPLW[2]=PL90;2\nP[21]=PW90;3\n").unwrap();
    let table = ProsolTable::load(&prosol).unwrap();

    let pp = PulseProgram::parse("hsqcetgp",HSQC,ScanMode::Calibration).unwrap();
    let used = pp.used_parameters();
    let cal = ChannelCalibration::cross_reference(&[1,2],used.get(Family::P),pp.power_channels(),&table);
    assert_eq!(cal.pulse_parameter(1).unwrap(),"P 1");
    assert_eq!(cal.pulse_parameter(2).unwrap(),"P 3");
    assert_eq!(cal.power_parameter(2).unwrap(),"PLdB 2");
    // pl1 is only mentioned in a comment
    assert_eq!(cal.power_parameter(1),None);

    let calib = dir.path().join("p_calib.txt");
    fs::write(&calib,"1H 8.5 -12.3\n13c 15 -3\n").unwrap();
    let entries = CalibrationEntry::load(&calib).unwrap();
    assert_eq!(entries[1].nucleus,"13C");
}

#[test]
fn shape_names_decode_by_position(){
    let names = array_string::decode("<><Crp60,0.5,20.1><Gaus1.1000><>");
    assert_eq!(names.len(),4);
    assert_eq!(names[1],"Crp60,0.5,20.1");
    assert_eq!(names.get(4),None);
    assert_eq!(array_string::encode(&names),"<><Crp60,0.5,20.1><Gaus1.1000><>");
}
