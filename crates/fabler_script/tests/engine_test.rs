//! Tests for the script engine driving loop and command handlers.

mod test_utils;

use fabler_core::{ResponseBank, StoryDetails};
use fabler_error::FablerErrorKind;
use fabler_script::{
    Command, InMemoryScriptLoader, OpalAction, ScriptEngine, ScriptPaths, Step,
};
use std::collections::HashSet;
use std::io::Write;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use test_utils::{Call, MockActuator, MockPersonalization, default_details, start_engine};

#[tokio::test]
async fn test_main_open_failure_is_fatal() {
    let result = start_engine(
        InMemoryScriptLoader::new(),
        MockActuator::new(),
        MockPersonalization::single("story.txt"),
    )
    .await;

    let err = result.err().expect("Missing main script");
    assert!(matches!(err.kind(), FablerErrorKind::Script(_)));
}

#[tokio::test]
async fn test_builder_requires_every_part() {
    let result = ScriptEngine::<MockActuator, MockPersonalization>::builder()
        .actuator(MockActuator::new())
        .loader(InMemoryScriptLoader::new().with_script("main.txt", ""))
        .main_script("main.txt")
        .start()
        .await;

    let err = result.err().expect("Missing personalization");
    assert!(matches!(err.kind(), FablerErrorKind::Config(_)));
}

#[tokio::test]
async fn test_paths_resolve_session_files() {
    let loader = InMemoryScriptLoader::new()
        .with_script("scripts/session/main.txt", "ADD\tSTORY_INTROS\tintros.txt\nROBOT\tSTORY_INTRO\n")
        .with_script("scripts/session/intros.txt", "Hello!\n");
    let actuator = MockActuator::new();

    let mut engine = ScriptEngine::builder()
        .actuator(actuator.clone())
        .personalization(MockPersonalization::single("story.txt"))
        .loader(loader)
        .paths(ScriptPaths::new("scripts", "session", "stories"))
        .main_script("main.txt")
        .seed(1)
        .feedback_pause(Duration::from_secs(1))
        .speech_timeout(Duration::from_secs(5))
        .start()
        .await
        .expect("Engine starts");
    engine.run().await.expect("Session runs");

    assert_eq!(actuator.calls(), vec![Call::said("Hello!")]);
}

#[tokio::test]
async fn test_step_reports_each_line() {
    let loader = InMemoryScriptLoader::new().with_script(
        "main.txt",
        "OPAL\tLOAD_STORY\n\nUNKNOWN\tthing\nPAUSE\tsoon\nROBOT\tDO\thi\n",
    );
    let mut engine = start_engine(
        loader,
        MockActuator::new(),
        MockPersonalization::single("story.txt"),
    )
    .await
    .expect("Engine starts");

    let mut steps = Vec::new();
    loop {
        let step = engine.step().await.expect("Step");
        if step == Step::SessionComplete {
            break;
        }
        steps.push(step);
    }

    assert_eq!(steps.len(), 5);
    assert_eq!(steps[0], Step::Executed(Command::Opal(OpalAction::LoadStory)));
    assert_eq!(&steps[1..4], &[Step::Ignored, Step::Ignored, Step::Ignored]);
    assert!(matches!(steps[4], Step::Executed(Command::Robot(_))));
    assert_eq!(*engine.playback().commands_executed(), 2);
}

#[tokio::test]
async fn test_story_pushes_personalized_script() {
    let loader = InMemoryScriptLoader::new()
        .with_script("main.txt", "SET\tMAX_STORIES\t3\nSTORY\nROBOT\tDO\tafter story\n")
        .with_script("frog.txt", "ROBOT\tDO\tribbit\n");
    let actuator = MockActuator::new();
    let mut engine = start_engine(loader, actuator.clone(), MockPersonalization::single("frog.txt"))
        .await
        .expect("Engine starts");

    let summary = engine.run().await.expect("Session runs");

    assert_eq!(
        actuator.calls(),
        vec![Call::said("ribbit"), Call::said("after story")]
    );
    assert_eq!(*summary.stories_told(), 1);
    assert_eq!(*summary.commands_executed(), 4);
}

#[tokio::test]
async fn test_max_stories_scenario() {
    let loader = InMemoryScriptLoader::new()
        .with_script(
            "main.txt",
            "SET\tMAX_STORIES\t1\n\
             SET\tMAX_GAME_TIME\t10\n\
             ADD\tMAX_STORIES_REACHED\tdone.txt\n\
             STORY\n\
             STORY\n",
        )
        .with_script("done.txt", "That's all for today!\n")
        .with_script("one.txt", "ROBOT\tDO\tonce upon a time\n")
        .with_script("two.txt", "ROBOT\tDO\tnever told\n");
    let actuator = MockActuator::new();
    let personalization = MockPersonalization::new(
        &["one.txt", "two.txt"],
        test_utils::default_details(),
    );
    let mut engine = start_engine(loader, actuator.clone(), personalization.clone())
        .await
        .expect("Engine starts");

    let summary = engine.run().await.expect("Session runs");

    assert_eq!(*summary.stories_told(), 1);
    assert_eq!(personalization.script_requests(), 1);
    assert_eq!(
        actuator.calls(),
        vec![
            Call::said("once upon a time"),
            Call::said("That's all for today!")
        ]
    );
}

#[tokio::test]
async fn test_load_story_at_limit_sends_nothing_and_cancels_repeat() {
    let loader = InMemoryScriptLoader::new()
        .with_script("main.txt", "SET\tMAX_STORIES\t0\nREPEAT\t3\tloop.txt\nROBOT\tDO\tbye\n")
        .with_script("loop.txt", "OPAL\tLOAD_STORY\nROBOT\tDO\tstill repeating\n");
    let actuator = MockActuator::new();
    let mut engine = start_engine(loader, actuator.clone(), MockPersonalization::single("x.txt"))
        .await
        .expect("Engine starts");

    engine.run().await.expect("Session runs");

    assert!(actuator.opal_commands().is_empty());
    assert_eq!(actuator.calls(), vec![Call::said("bye")]);
    assert!(!engine.contexts().is_repeating());
}

#[tokio::test]
async fn test_load_next_story_sets_up_scenes() {
    let loader = InMemoryScriptLoader::new()
        .with_script("main.txt", "SET\tMAX_STORIES\t2\nOPAL\tLOAD_STORY\n");
    let actuator = MockActuator::new();
    let mut engine = start_engine(loader, actuator.clone(), MockPersonalization::single("x.txt"))
        .await
        .expect("Engine starts");

    engine.run().await.expect("Session runs");

    assert_eq!(
        actuator.opal_commands(),
        vec!["SETUP_STORY_SCENE", "LOAD_OBJECT", "LOAD_OBJECT", "LOAD_OBJECT"]
    );
    let calls = actuator.calls();
    let Call::Opal {
        properties: Some(setup),
        ..
    } = &calls[0]
    else {
        panic!("Expected SETUP_STORY_SCENE payload");
    };
    let setup: serde_json::Value = serde_json::from_str(setup).expect("Setup is JSON");
    assert_eq!(setup["numScenes"], 3);
    assert_eq!(setup["scenesInOrder"], false);
    assert_eq!(setup["numAnswers"], 3);

    let objects = actuator.loaded_objects();
    for (i, (object, name)) in objects.iter().zip(["forest", "river", "castle"]).enumerate() {
        let slot = i as u64 + 1;
        assert_eq!(object["name"], name);
        assert_eq!(object["tag"], "PlayObject");
        assert_eq!(object["slot"], slot);
        assert_eq!(object["draggable"], true);
        assert_eq!(object["isAnswerSlot"], false);
        assert_eq!(object["correctSlot"], slot);
    }
}

#[tokio::test]
async fn test_in_order_scenes_are_fixed() {
    let details = StoryDetails::new(vec!["a".to_string(), "b".to_string()], true, 2);
    let loader = InMemoryScriptLoader::new().with_script("main.txt", "OPAL\tLOAD_STORY\n");
    let actuator = MockActuator::new();
    let mut engine = start_engine(
        loader,
        actuator.clone(),
        MockPersonalization::new(&["x.txt"], details),
    )
    .await
    .expect("Engine starts");

    engine.run().await.expect("Session runs");

    let objects = actuator.loaded_objects();
    assert_eq!(objects.len(), 2);
    for object in objects {
        assert_eq!(object["draggable"], false);
        assert!(object.get("correctSlot").is_none());
    }
}

#[tokio::test]
async fn test_load_answers_is_a_slot_permutation() {
    let loader = InMemoryScriptLoader::new()
        .with_script("main.txt", "OPAL\tLOAD_ANSWERS\tb, a, c\n");
    let actuator = MockActuator::new();
    let mut engine = start_engine(loader, actuator.clone(), MockPersonalization::single("x.txt"))
        .await
        .expect("Engine starts");

    engine.run().await.expect("Session runs");

    let objects = actuator.loaded_objects();
    assert_eq!(objects.len(), 3);
    let slots: HashSet<u64> = objects
        .iter()
        .map(|o| o["slot"].as_u64().expect("slot"))
        .collect();
    let names: HashSet<String> = objects
        .iter()
        .map(|o| o["name"].as_str().expect("name").to_string())
        .collect();
    assert_eq!(slots, HashSet::from([1, 2, 3]));
    assert_eq!(
        names,
        HashSet::from(["a".to_string(), "b".to_string(), "c".to_string()])
    );
    assert!(objects.iter().all(|o| o["isAnswerSlot"] == true && o["draggable"] == false));
    assert_eq!(engine.playback().current_answers().len(), 3);
}

#[tokio::test]
async fn test_seeded_sessions_repeat_choices() {
    async fn answer_order() -> Vec<String> {
        let loader = InMemoryScriptLoader::new()
            .with_script("main.txt", "OPAL\tLOAD_ANSWERS\ta,b,c,d,e,f\n");
        let mut engine = start_engine(
            loader,
            MockActuator::new(),
            MockPersonalization::single("x.txt"),
        )
        .await
        .expect("Engine starts");
        engine.run().await.expect("Session runs");
        engine.playback().current_answers().clone()
    }

    assert_eq!(answer_order().await, answer_order().await);
}

#[tokio::test]
async fn test_load_all_sends_each_descriptor() {
    let loader = InMemoryScriptLoader::new()
        .with_script("main.txt", "OPAL\tLOAD_ALL\tobjects.txt\n")
        .with_script("objects.txt", "{\"name\":\"tree\"}  \n\n{\"name\":\"rock\"}\n");
    let actuator = MockActuator::new();
    let mut engine = start_engine(loader, actuator.clone(), MockPersonalization::single("x.txt"))
        .await
        .expect("Engine starts");

    engine.run().await.expect("Session runs");

    let names: Vec<_> = actuator
        .loaded_objects()
        .into_iter()
        .map(|o| o["name"].clone())
        .collect();
    assert_eq!(names, vec!["tree", "rock"]);
}

#[tokio::test]
async fn test_add_replaces_and_missing_file_keeps_bank_unset() {
    let loader = InMemoryScriptLoader::new()
        .with_script(
            "main.txt",
            "ADD\tINCORRECT_RESPONSES\tfirst.txt\n\
             ADD\tINCORRECT_RESPONSES\tsecond.txt\n\
             ADD\tNO_RESPONSES\tmissing.txt\n",
        )
        .with_script("first.txt", "one\ntwo\n")
        .with_script("second.txt", "three\n");
    let mut engine = start_engine(
        loader,
        MockActuator::new(),
        MockPersonalization::single("x.txt"),
    )
    .await
    .expect("Engine starts");

    engine.run().await.expect("Session runs");

    assert_eq!(
        engine.banks().phrases(ResponseBank::IncorrectResponses),
        Some(&["three".to_string()][..])
    );
    assert!(!engine.banks().is_loaded(ResponseBank::CorrectResponses));
    assert!(!engine.banks().is_loaded(ResponseBank::NoResponses));
}

#[tokio::test]
async fn test_repeat_max_stories_alias() {
    let loader = InMemoryScriptLoader::new()
        .with_script(
            "main.txt",
            "REPEAT\tMAX_STORIES\tloop.txt\nSET\tMAX_STORIES\t2\nREPEAT\tMAX_STORIES\tloop.txt\n",
        )
        .with_script("loop.txt", "ROBOT\tDO\tagain\n");
    let actuator = MockActuator::new();
    let mut engine = start_engine(loader, actuator.clone(), MockPersonalization::single("x.txt"))
        .await
        .expect("Engine starts");

    engine.run().await.expect("Session runs");

    // One pass while unset, then two once MAX_STORIES is 2.
    assert_eq!(actuator.calls().len(), 3);
}

#[tokio::test]
async fn test_missing_repeat_script_is_skipped() {
    let loader = InMemoryScriptLoader::new()
        .with_script("main.txt", "REPEAT\t2\tmissing.txt\nROBOT\tDO\tstill here\n");
    let actuator = MockActuator::new();
    let mut engine = start_engine(loader, actuator.clone(), MockPersonalization::single("x.txt"))
        .await
        .expect("Engine starts");

    engine.run().await.expect("Session runs");

    assert_eq!(actuator.calls(), vec![Call::said("still here")]);
    assert!(!engine.contexts().is_repeating());
}

#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[tokio::test]
async fn test_unset_story_limit_does_not_warn_per_story() {
    let logs = LogBuffer::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::WARN)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let loader = InMemoryScriptLoader::new()
        .with_script("main.txt", "REPEAT\t3\tloop.txt\n")
        .with_script("loop.txt", "STORY\n")
        .with_script("story.txt", "");
    let mut engine = start_engine(
        loader,
        MockActuator::new(),
        MockPersonalization::new(&["story.txt", "story.txt", "story.txt"], default_details()),
    )
    .await
    .expect("Engine starts");
    engine.run().await.expect("Session runs");

    assert_eq!(*engine.summary().stories_told(), 3);
    let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
    assert!(!output.contains("MAX_STORIES"), "unexpected warnings: {output}");
}

#[tokio::test]
async fn test_missing_nested_repeat_script_ends_running_repeat() {
    let loader = InMemoryScriptLoader::new()
        .with_script("main.txt", "REPEAT\t3\touter.txt\nROBOT\tDO\tmain end\n")
        .with_script(
            "outer.txt",
            "ROBOT\tDO\touter\nREPEAT\t2\tmissing.txt\nROBOT\tDO\tafter inner\n",
        );
    let actuator = MockActuator::new();
    let mut engine = start_engine(loader, actuator.clone(), MockPersonalization::single("x.txt"))
        .await
        .expect("Engine starts");

    engine.run().await.expect("Session runs");

    assert_eq!(
        actuator.calls(),
        vec![Call::said("outer"), Call::said("main end")]
    );
    assert!(!engine.contexts().is_repeating());
}

#[tokio::test]
async fn test_actuator_failure_does_not_stop_session() {
    let loader = InMemoryScriptLoader::new()
        .with_script("main.txt", "ROBOT\tDO\tone\nOPAL\tSHOW\n");
    let actuator = MockActuator::new().with_robot_failure();
    let mut engine = start_engine(loader, actuator.clone(), MockPersonalization::single("x.txt"))
        .await
        .expect("Engine starts");

    let summary = engine.run().await.expect("Session runs");

    assert_eq!(*summary.commands_executed(), 2);
    assert_eq!(actuator.opal_commands(), vec!["SHOW"]);
}

#[tokio::test]
async fn test_unset_intro_bank_skips_playback() {
    let loader = InMemoryScriptLoader::new()
        .with_script("main.txt", "ROBOT\tSTORY_INTRO\nROBOT\tSTORY_CLOSING\n");
    let actuator = MockActuator::new();
    let mut engine = start_engine(loader, actuator.clone(), MockPersonalization::single("x.txt"))
        .await
        .expect("Engine starts");

    engine.run().await.expect("Session runs");

    assert!(actuator.calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_pause_blocks_for_whole_seconds() {
    let loader = InMemoryScriptLoader::new()
        .with_script("main.txt", "PAUSE\t5\nPAUSE\tfive\n");
    let mut engine = start_engine(
        loader,
        MockActuator::new(),
        MockPersonalization::single("x.txt"),
    )
    .await
    .expect("Engine starts");

    assert!(matches!(engine.step().await.expect("Step"), Step::Executed(_)));
    assert!(engine.playback().elapsed() >= Duration::from_secs(5));
    assert_eq!(engine.step().await.expect("Step"), Step::Ignored);
    assert!(engine.playback().elapsed() < Duration::from_secs(6));
}

#[tokio::test(start_paused = true)]
async fn test_story_line_after_game_time_runs_fallback() {
    let loader = InMemoryScriptLoader::new()
        .with_script(
            "main.txt",
            "SET\tMAX_GAME_TIME\t1\nADD\tMAX_STORIES_REACHED\tdone.txt\nPAUSE\t61\nSTORY\n",
        )
        .with_script("done.txt", "Time is up\n");
    let actuator = MockActuator::new();
    let personalization = MockPersonalization::single("x.txt");
    let mut engine = start_engine(loader, actuator.clone(), personalization.clone())
        .await
        .expect("Engine starts");

    engine.run().await.expect("Session runs");

    assert_eq!(personalization.script_requests(), 0);
    assert_eq!(actuator.calls(), vec![Call::said("Time is up")]);
}
