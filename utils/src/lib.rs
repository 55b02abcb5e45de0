use std::fs::File;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::{thread, time};
use encoding::all::ISO_8859_1;
use encoding::{DecoderTrap, EncoderTrap, Encoding};
use glob::Pattern;
use walkdir::WalkDir;

/// read a text file written by the spectrometer software. Pulse programs and parameter
/// files are latin-1, so every byte decodes to exactly one char.
pub fn read_latin1(file_path:&Path) -> io::Result<String> {
    let mut f = File::open(file_path)?;
    let mut bytes = Vec::<u8>::new();
    f.read_to_end(&mut bytes)?;
    ISO_8859_1.decode(&bytes, DecoderTrap::Strict)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData,format!("cannot decode {:?}: {}",file_path,e)))
}

pub fn write_latin1(file_path:&Path,text:&str) -> io::Result<()> {
    let bytes = ISO_8859_1.encode(text,EncoderTrap::Strict)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData,format!("cannot encode text for {:?}: {}",file_path,e)))?;
    let mut f = File::create(file_path)?;
    f.write_all(&bytes)?;
    f.flush()
}

/// split text into lines, each keeping its terminator
pub fn split_lines(text:&str) -> Vec<String> {
    text.split_inclusive('\n').map(|line| line.to_string()).collect()
}

/// candidate directories are relative to the nmr working directory unless absolute
pub fn resolve_dir(base_dir:&Path,dir:&str) -> PathBuf {
    let d = Path::new(dir);
    match d.is_absolute() {
        true => d.to_owned(),
        false => base_dir.join(d)
    }
}

/// first existing `<dir>/<name>` over the candidate directories, in priority order
pub fn find_in_dirs(base_dir:&Path,dirs:&[String],name:&str) -> Option<PathBuf> {
    dirs.iter()
        .map(|dir| resolve_dir(base_dir,dir).join(name))
        .find(|path| path.is_file())
}

// recursive walk, shell-style wildcard on the file name only
pub fn matching_filenames(base_dir:&Path,pattern:&str) -> Result<Vec<String>,glob::PatternError> {
    let pat = Pattern::new(pattern)?;
    let mut names = Vec::<String>::new();
    for entry in WalkDir::new(base_dir).into_iter().filter_map(|e| e.ok()) {
        if !entry.file_type().is_file() {
            continue
        }
        if let Some(name) = entry.file_name().to_str() {
            if pat.matches(name) {
                names.push(name.to_string());
            }
        }
    }
    names.sort();
    Ok(names)
}

/// block until `file_path` exists, checking once per `interval` at most `max_retries` times
/// after the first look. Returns false when the file never showed up.
pub fn wait_for_file(file_path:&Path,max_retries:u32,interval:time::Duration) -> bool {
    let mut retries = 0;
    while !file_path.exists() {
        if retries >= max_retries {
            return false
        }
        log::debug!("waiting for {:?} ({}/{})",file_path,retries+1,max_retries);
        thread::sleep(interval);
        retries += 1;
    }
    true
}

/// zip entry names are kept ascii
pub fn ascii_lossy(name:&str) -> String {
    name.chars().map(|c| if c.is_ascii() { c } else { '?' }).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn latin1_round_trip(){
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("zgpr");
        let text = ";zgpr\n;avance-version (12/01/11)\n;Ångström µs\n";
        write_latin1(&p,text).unwrap();
        assert_eq!(fs::read(&p).unwrap().len(),text.chars().count());
        assert_eq!(read_latin1(&p).unwrap(),text);
    }

    #[test]
    fn lines_keep_terminators(){
        let lines = split_lines("1 ze\n2 d1\nexit");
        assert_eq!(lines,vec!["1 ze\n","2 d1\n","exit"]);
        assert_eq!(split_lines("d1\r\n\r\n"),vec!["d1\r\n","\r\n"]);
    }

    #[test]
    fn first_existing_candidate_wins(){
        let base = tempfile::tempdir().unwrap();
        let abs = tempfile::tempdir().unwrap();
        fs::create_dir_all(base.path().join("lists/pp/user")).unwrap();
        fs::create_dir_all(base.path().join("lists/pp")).unwrap();
        fs::write(base.path().join("lists/pp/zg30"),"1 ze\n").unwrap();
        fs::write(abs.path().join("zg30"),"2 ze\n").unwrap();
        let dirs = vec![
            String::from("lists/pp/user"),
            abs.path().to_str().unwrap().to_string(),
            String::from("lists/pp"),
        ];
        assert_eq!(find_in_dirs(base.path(),&dirs,"zg30"),Some(abs.path().join("zg30")));
        assert_eq!(find_in_dirs(base.path(),&dirs,"missing"),None);
    }

    #[test]
    fn wildcard_matching_is_recursive(){
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("pdata/1")).unwrap();
        fs::write(dir.path().join("spnam3"),"").unwrap();
        fs::write(dir.path().join("pdata/1/spnam12"),"").unwrap();
        fs::write(dir.path().join("gpnam1"),"").unwrap();
        let names = matching_filenames(dir.path(),"spnam*").unwrap();
        assert_eq!(names,vec!["spnam12","spnam3"]);
    }

    #[test]
    fn wait_gives_up(){
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("format.ased");
        assert!(!wait_for_file(&p,2,time::Duration::from_millis(1)));
        fs::write(&p,"").unwrap();
        assert!(wait_for_file(&p,0,time::Duration::from_millis(1)));
    }

    #[test]
    fn non_ascii_replaced(){
        assert_eq!(ascii_lossy("Gauß.1000"),"Gau?.1000");
    }
}
