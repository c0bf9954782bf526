//! Prompt templates for the four flows.
//!
//! Every template asks for a single JSON object so replies can go through
//! [`parse_structured`](crate::structured::parse_structured).

use crate::launch_file::LaunchFileType;

/// Grounded ROS2 question answering. `context` may be empty.
pub fn answer_question(question: &str, context: &str) -> String {
    let grounding = if context.is_empty() {
        "No reference excerpts were found for this question. Answer from your \
         knowledge of the official ROS2 documentation."
            .to_string()
    } else {
        format!(
            "Use the following reference excerpts where they are relevant. \
             Prefer them over general knowledge when they disagree.\n\n\
             <context>\n{context}\n</context>"
        )
    };

    format!(
        r#"You are a ROS2 expert. Answer the question below for a general ROS2 audience, grounded in the official ROS2 documentation. Do not refer to a specific company's internal documentation or hardware unless the question asks for it.

{grounding}

Format the answer in Markdown: use lists, bold text and fenced code blocks where they help.

Question: {question}

Respond with a single JSON object of the form {{"answer": "<markdown answer>"}} and nothing else."#
    )
}

/// colcon build log triage.
pub fn analyze_build_log(log: &str) -> String {
    format!(
        r#"You are an expert ROS2 and CMake build engineer. Analyze the colcon build log below and identify every error in it.

Log:
```
{log}
```

Instructions:
1. Look for error indicators such as `CMake Error`, `error:`, `Failed <<<` and compiler diagnostics. Report each distinct error once.
2. For each error produce an object with:
   - "title": a short descriptive title
   - "error": the exact error message from the log
   - "explanation": the root cause
   - "suggestion": a concrete fix, in Markdown (use code blocks for code)
3. Respond with a single JSON object whose only key is "issues", an array of those objects.
4. If the log contains no errors, respond with {{"issues": []}}.

Example input:
```
Starting >>> my_robot_package
--- stderr: my_robot_package
CMake Error at CMakeLists.txt:14 (find_package):
  Could not find a package configuration file provided by "rclpy".
---
Failed   <<< my_robot_package [2.97s, exited with code 1]
```

Example output:
{{"issues": [{{"title": "Missing 'rclpy' dependency", "error": "CMake Error at CMakeLists.txt:14 (find_package): Could not find a package configuration file provided by \"rclpy\".", "explanation": "The build cannot locate rclpy, the ROS2 Python client library. The package is either not installed or not declared as a dependency.", "suggestion": "Add `<depend>rclpy</depend>` to `package.xml`, source your ROS2 installation, and re-run `colcon build`."}}]}}

Respond with the JSON object only."#
    )
}

/// Launch file review.
pub fn debug_launch_file(content: &str, file_type: LaunchFileType) -> String {
    format!(
        r#"You are an expert ROS2 developer who specializes in debugging launch files.

Review the launch file below for structural and syntax problems (wrong tags or keys, missing required attributes, bad substitutions, incorrect package or executable references, parameter mistakes).

Launch file type: {file_type}
Launch file content:
```
{content}
```

Respond with a single JSON object with exactly these keys:
- "issuesDetected": true if any problem was found, otherwise false
- "suggestions": Markdown with concrete fixes, including corrected code blocks (empty string if none)
- "explanation": Markdown explaining each problem found (or why the file looks correct)

Respond with the JSON object only."#,
        file_type = file_type.as_str(),
    )
}

/// TF tree inspection.
pub fn analyze_tf_tree(tree: &str) -> String {
    format!(
        r#"You are a ROS2 expert. Analyze the TF tree below and identify potential problems such as missing frames, disconnected subtrees, multiple parents, unexpected root frames or coordinate frame mismatches.

TF tree:
```
{tree}
```

Respond with a single JSON object of the form {{"issues": [{{"description": "...", "suggestion": "..."}}]}}. Use Markdown inside "description" and "suggestion". If the tree looks healthy, respond with {{"issues": []}}.

Respond with the JSON object only."#
    )
}
