use std::io::{self, BufRead, StdinLock, Stdout, Write};
use std::path::PathBuf;
use std::process::Command;
use regex::Regex;
use crate::error::InstrumentError;
use crate::port::{DatasetLocation, InstrumentPort};

/*
    Parameter access goes through a helper program running inside the spectrometer
    software. Every call launches `<program> <args..> <verb> <operands..>` and scans its
    stdout for one of

        value:<text>        get, dims
        novalue             get of a parameter the store does not have
        dataset:<name>;<expno>;<procno>;<root>
        status:ok           put
        error:<message>     anything refused

    Dialogs are answered on the terminal that runs the tool.
 */

const GET:&str = "get";
const PUT:&str = "put";
const DIMS:&str = "dims";
const DATASET:&str = "dataset";

enum Reply {
    Value(String),
    NoValue,
    Dataset(DatasetLocation),
    Done,
}

pub struct ScriptInstrument<R:BufRead,W:Write> {
    program:String,
    args:Vec<String>,
    input:R,
    output:W,
}

impl ScriptInstrument<StdinLock<'static>,Stdout> {
    pub fn new(program:&str,args:&[String]) -> Self {
        Self::with_terminal(program,args,io::stdin().lock(),io::stdout())
    }
}

impl<R:BufRead,W:Write> ScriptInstrument<R,W> {

    pub fn with_terminal(program:&str,args:&[String],input:R,output:W) -> Self {
        Self {
            program:program.to_string(),
            args:args.to_vec(),
            input,
            output,
        }
    }

    fn call(&self,verb:&str,operands:&[&str]) -> Result<Reply,InstrumentError> {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args).arg(verb).args(operands);
        log::debug!("{:?}",cmd);
        let out = cmd.output().map_err(|e| InstrumentError::Bridge(format!("cannot launch {}: {}",self.program,e)))?;
        let command = format!("{} {}",verb,operands.join(" "));
        if !out.status.success() {
            let stderr = String::from_utf8_lossy(&out.stderr);
            return Err(InstrumentError::Bridge(format!("{} exited with {} on {}: {}",self.program,out.status,command.trim(),stderr.trim())))
        }
        let stdout = String::from_utf8_lossy(&out.stdout);
        parse_reply(command.trim(),&stdout)
    }

    /// read one line from the terminal, `None` at end of input
    fn read_answer(&mut self) -> Result<Option<String>,InstrumentError> {
        let mut line = String::new();
        match self.input.read_line(&mut line)? {
            0 => Ok(None),
            _ => Ok(Some(line.trim_end_matches(['\n','\r']).to_string()))
        }
    }
}

fn parse_reply(command:&str,stdout:&str) -> Result<Reply,InstrumentError> {
    let value_reg = Regex::new(r"^value:(.*)$").expect("invalid regex");
    let dataset_reg = Regex::new(r"^dataset:([^;]*);([^;]*);([^;]*);(.*)$").expect("invalid regex");
    let error_reg = Regex::new(r"^error:(.*)$").expect("invalid regex");
    // the helper may print other chatter; the last recognized line wins
    let mut reply = None;
    for line in stdout.lines().map(|l| l.trim_end()) {
        if let Some(caps) = error_reg.captures(line) {
            return Err(InstrumentError::Status {
                command:command.to_string(),
                message:caps[1].trim().to_string(),
            })
        }
        if let Some(caps) = value_reg.captures(line) {
            reply = Some(Reply::Value(caps[1].to_string()));
        }
        else if let Some(caps) = dataset_reg.captures(line) {
            reply = Some(Reply::Dataset(DatasetLocation {
                name:caps[1].to_string(),
                expno:caps[2].to_string(),
                procno:caps[3].to_string(),
                root:PathBuf::from(&caps[4]),
            }));
        }
        else if line == "novalue" {
            reply = Some(Reply::NoValue);
        }
        else if line == "status:ok" {
            reply = Some(Reply::Done);
        }
    }
    reply.ok_or_else(|| InstrumentError::Parse {
        command:command.to_string(),
        output:stdout.to_string(),
    })
}

fn unexpected(command:&str) -> InstrumentError {
    InstrumentError::Parse {
        command:command.to_string(),
        output:String::from("reply of the wrong kind"),
    }
}

impl<R:BufRead,W:Write> InstrumentPort for ScriptInstrument<R,W> {

    fn get(&mut self,name:&str) -> Result<Option<String>,InstrumentError> {
        match self.call(GET,&[name])? {
            Reply::Value(v) => Ok(Some(v)),
            Reply::NoValue => Ok(None),
            _ => Err(unexpected(GET))
        }
    }

    fn put(&mut self,name:&str,value:&str) -> Result<(),InstrumentError> {
        match self.call(PUT,&[name,value])? {
            Reply::Done => Ok(()),
            _ => Err(unexpected(PUT))
        }
    }

    fn dimension_count(&mut self) -> Result<usize,InstrumentError> {
        match self.call(DIMS,&[])? {
            Reply::Value(v) => v.trim().parse().map_err(|_| InstrumentError::Parse {
                command:DIMS.to_string(),
                output:v,
            }),
            _ => Err(unexpected(DIMS))
        }
    }

    fn current_dataset(&mut self) -> Result<DatasetLocation,InstrumentError> {
        match self.call(DATASET,&[])? {
            Reply::Dataset(ds) => Ok(ds),
            _ => Err(unexpected(DATASET))
        }
    }

    fn notify(&mut self,title:&str,message:&str) -> Result<(),InstrumentError> {
        writeln!(self.output,"{}",title)?;
        writeln!(self.output,"{}",message)?;
        self.output.flush()?;
        Ok(())
    }

    fn prompt_text(&mut self,title:&str,header:&str,labels:&[String],defaults:&[String]) -> Result<Option<Vec<String>>,InstrumentError> {
        writeln!(self.output,"{}",title)?;
        if !header.is_empty() {
            writeln!(self.output,"{}",header)?;
        }
        let mut answers = Vec::<String>::with_capacity(labels.len());
        for (idx,label) in labels.iter().enumerate() {
            let default = defaults.get(idx).map(|s| s.as_str()).unwrap_or("");
            write!(self.output,"{} [{}]: ",label,default)?;
            self.output.flush()?;
            match self.read_answer()? {
                None => return Ok(None),
                Some(answer) => match answer.trim().is_empty() {
                    true => answers.push(default.to_string()),
                    false => answers.push(answer.trim().to_string()),
                }
            }
        }
        Ok(Some(answers))
    }

    fn prompt_choice(&mut self,title:&str,message:&str,buttons:&[&str]) -> Result<Option<usize>,InstrumentError> {
        writeln!(self.output,"{}",title)?;
        writeln!(self.output,"{}",message)?;
        loop {
            let options:Vec<String> = buttons.iter().enumerate().map(|(idx,b)| format!("{}) {}",idx+1,b)).collect();
            write!(self.output,"{}: ",options.join("  "))?;
            self.output.flush()?;
            let answer = match self.read_answer()? {
                None => return Ok(None),
                Some(answer) => answer,
            };
            match answer.trim().parse::<usize>() {
                Ok(n) if n >= 1 && n <= buttons.len() => return Ok(Some(n-1)),
                _ => writeln!(self.output,"please enter a number between 1 and {}",buttons.len())?
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn terminal(input:&str) -> ScriptInstrument<Cursor<Vec<u8>>,Vec<u8>> {
        ScriptInstrument::with_terminal("true",&[],Cursor::new(input.as_bytes().to_vec()),Vec::new())
    }

    #[test]
    fn replies(){
        assert!(matches!(parse_reply("get NS","loading\nvalue:16\n"),Ok(Reply::Value(v)) if v == "16"));
        assert!(matches!(parse_reply("get PH_ref","value:\n"),Ok(Reply::Value(v)) if v.is_empty()));
        assert!(matches!(parse_reply("get FOO","novalue\n"),Ok(Reply::NoValue)));
        assert!(matches!(parse_reply("put NS 8","status:ok\n"),Ok(Reply::Done)));
        match parse_reply("dataset","dataset:lysozyme;12;1;/opt/data/nmr\n") {
            Ok(Reply::Dataset(ds)) => assert_eq!(ds.data_dir(),PathBuf::from("/opt/data/nmr/lysozyme/12")),
            _ => panic!("expected a dataset")
        }
        assert!(matches!(parse_reply("put TD x","error:not a number\n"),Err(InstrumentError::Status{..})));
        assert!(matches!(parse_reply("get NS",""),Err(InstrumentError::Parse{..})));
    }

    #[test]
    fn text_prompt_uses_defaults(){
        let mut term = terminal("\n-3.2\n");
        let labels = vec!["P 1".to_string(),"PLdB 1".to_string()];
        let defaults = vec!["8.5".to_string(),"-1.0".to_string()];
        let answers = term.prompt_text("Enter pulsecal values","",&labels,&defaults).unwrap();
        assert_eq!(answers,Some(vec!["8.5".to_string(),"-3.2".to_string()]));
        let shown = String::from_utf8(term.output.clone()).unwrap();
        assert!(shown.contains("PLdB 1 [-1.0]: "));
    }

    #[test]
    fn end_of_input_cancels(){
        let mut term = terminal("zgpr_2\n");
        let labels = vec!["Name:".to_string(),"Dir:".to_string()];
        assert_eq!(term.prompt_text("t","",&labels,&[]).unwrap(),None);
        let mut term = terminal("5\n2\n");
        assert_eq!(term.prompt_choice("Filename Same","overwrite?",&["Yes","No"]).unwrap(),Some(1));
        let mut term = terminal("");
        assert_eq!(term.prompt_choice("Filename Same","overwrite?",&["Yes","No"]).unwrap(),None);
    }

    #[cfg(unix)]
    #[test]
    fn bridge_round_trip(){
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("bridge.sh");
        std::fs::write(&script,"\
case \"$1\" in
  get) if [ \"$2\" = NS ]; then echo value:16; else echo novalue; fi ;;
  put) echo status:ok ;;
  dims) echo value:2 ;;
  dataset) echo \"dataset:lysozyme;12;1;/opt/data/nmr\" ;;
  *) echo \"error:unknown verb $1\" ;;
esac
").unwrap();
        let args = vec![script.to_string_lossy().to_string()];
        let mut port = ScriptInstrument::with_terminal("sh",&args,Cursor::new(Vec::<u8>::new()),Vec::<u8>::new());
        assert_eq!(port.get("NS").unwrap(),Some("16".to_string()));
        assert_eq!(port.get("SPNAM").unwrap(),None);
        port.put("NS","32").unwrap();
        assert_eq!(port.dimension_count().unwrap(),2);
        assert_eq!(port.current_dataset().unwrap().expno,"12");
    }
}
