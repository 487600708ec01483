#[cfg(test)]
mod verify {
    use std::path::Path;

    use stf::language::{DescriptorError, Engine};
    use stf::parsing::{Options, ParsingError, Reader};

    fn read(content: &str) -> Engine {
        let mut engine = Engine::default();
        let mut reader = Reader::from_str("test.eng", content, Options::default());
        engine
            .read(&mut reader)
            .unwrap();
        engine
    }

    #[test]
    fn name_and_description() {
        let engine = read(r#"engine( name("Flying Scotsman") description("A4 Pacific") )"#);
        assert_eq!(
            engine,
            Engine {
                name: "Flying Scotsman".to_string(),
                description: "A4 Pacific".to_string(),
            }
        );
    }

    #[test]
    fn empty_name_defaults() {
        let engine = read("engine( name() )");
        assert_eq!(engine.name, "");
        assert_eq!(engine.description, "");
    }

    #[test]
    fn sections_outside_engine_ignored() {
        let engine = read(
            r#"
Wagon ( A4 Name ( "not the engine" ) )
Engine ( A4
    Type ( Steam )
    Name ( "Mallard" )
)
            "#,
        );
        assert_eq!(engine.name, "Mallard");
        assert_eq!(engine.description, "");
    }

    #[test]
    fn sample_files() {
        let engine = Engine::load(Path::new("tests/samples/a4.eng"), Options::default()).unwrap();
        assert_eq!(engine.name, "Flying Scotsman");
        assert_eq!(
            engine.description,
            "LNER Class A4 Pacific.\nStreamlined express passenger locomotive."
        );

        let engine = Engine::load(Path::new("tests/samples/acela.eng"), Options::default()).unwrap();
        assert_eq!(engine.name, "Acela Express");
        assert_eq!(engine.description, "");
        assert_eq!(engine.to_string(), "Acela Express");
    }

    #[test]
    fn name_defaults_to_file_stem() {
        let engine = Engine::load(Path::new("tests/fixtures/malformed_mass.wag"), Options::default()).unwrap();
        assert_eq!(engine.name, "malformed_mass");
    }

    #[test]
    fn include_spliced() {
        let engine = Engine::load(Path::new("tests/samples/gp38.eng"), Options::default()).unwrap();
        assert_eq!(engine.name, "GP38-2");
        assert_eq!(engine.description, "Four axle road switcher.");
    }

    #[test]
    fn include_disabled() {
        // the directive is then just an unrecognized token and its block
        let engine = Engine::load(
            Path::new("tests/broken/missing_include.eng"),
            Options::default().includes(false),
        )
        .unwrap();
        assert_eq!(engine.name, "missing_include");
    }

    #[test]
    fn include_failures() {
        match Engine::load(Path::new("tests/broken/missing_include.eng"), Options::default()) {
            Err(DescriptorError::Parsing(error)) => {
                assert!(matches!(error.error, ParsingError::IncludeFailed(_, _, _)));
                assert_eq!(error.problem, "unable to include \"nowhere/missing.inc\"");
                assert_eq!(error.line, 2);
            }
            other => panic!("Expected include failure but got {:?}", other),
        }

        match Engine::load(Path::new("tests/fixtures/self_include.eng"), Options::default()) {
            Err(DescriptorError::Parsing(error)) => {
                assert!(matches!(error.error, ParsingError::IncludeFailed(_, _, _)));
            }
            other => panic!("Expected include failure but got {:?}", other),
        }
    }

    #[test]
    fn include_cycle() {
        match Engine::load(Path::new("tests/fixtures/cycle_a.eng"), Options::default()) {
            Err(DescriptorError::Parsing(error)) => {
                match &error.error {
                    ParsingError::IncludeFailed(_, path, reason) => {
                        assert_eq!(path, "cycle_a.eng");
                        assert_eq!(reason, "The file is already being read by an enclosing include.");
                    }
                    other => panic!("Expected IncludeFailed but got {:?}", other),
                }
                assert_eq!(error.filename, Path::new("tests/fixtures/cycle_b.eng"));
                assert_eq!(error.line, 2);
            }
            other => panic!("Expected include failure but got {:?}", other),
        }
    }

    #[test]
    fn include_nesting_limit() {
        // each level names the same file by a longer path
        match Engine::load(Path::new("tests/fixtures/deep_include.eng"), Options::default()) {
            Err(DescriptorError::Parsing(error)) => match &error.error {
                ParsingError::IncludeFailed(_, path, reason) => {
                    assert_eq!(path, "../fixtures/deep_include.eng");
                    assert_eq!(reason, "Includes are nested more than 16 deep.");
                }
                other => panic!("Expected IncludeFailed but got {:?}", other),
            },
            other => panic!("Expected include failure but got {:?}", other),
        }
    }

    #[test]
    fn unclosed_block_in_include() {
        match Engine::load(Path::new("tests/fixtures/unclosed_include.eng"), Options::default()) {
            Err(DescriptorError::Parsing(error)) => {
                match error.error {
                    ParsingError::UnexpectedEndOfInput(_, Some(opened)) => {
                        assert_eq!(opened.line, 1);
                        assert_eq!(opened.column, 8);
                    }
                    ref other => panic!("Expected UnexpectedEndOfInput but got {:?}", other),
                }
                assert_eq!(error.filename, Path::new("tests/fixtures/common/unclosed.inc"));
            }
            other => panic!("Expected parsing failure but got {:?}", other),
        }
    }

    #[test]
    fn missing_engine_file() {
        match Engine::load(Path::new("tests/samples/nonexistent.eng"), Options::default()) {
            Err(DescriptorError::Loading(error)) => assert_eq!(error.problem, "File not found"),
            other => panic!("Expected loading failure but got {:?}", other),
        }
    }

    #[test]
    fn malformed_wagon_value() {
        let mut mass = 0.0;

        let mut reader = Reader::open(Path::new("tests/fixtures/malformed_mass.wag"), Options::default()).unwrap();
        let result = reader.process_file(stf::parsing::Handlers::new().on("wagon", |r| {
            r.process_block(stf::parsing::Handlers::new().on("mass", |r| {
                mass = r.read_number(0.0)?;
                Ok(())
            }))
        }));

        let error = result.unwrap_err();
        assert_eq!(error.filename, Path::new("tests/fixtures/malformed_mass.wag"));
        assert_eq!(error.line, 2);
        assert_eq!(error.code, "\tMass ( 12x3 )");
        assert_eq!(mass, 0.0);
    }
}
