use protoclass::{ConvertOptions, Protoclass};

fn run(input: &str) -> String {
    let p = Protoclass::default();
    let out = p
        .convert(
            input,
            ConvertOptions {
                source_type: Some(oxc_span::SourceType::mjs()),
                ..ConvertOptions::default()
            },
        )
        .unwrap();

    println!("==== INPUT ====\n{input}\n==== OUTPUT ====\n{}\n", out.code);
    out.code
}

#[test]
fn delegation_call_becomes_super_and_drops_the_this_argument() {
    let input = "\
function Dog(name, age) { Animal.call(this, name, age); }
util.inherits(Dog, Animal);
";
    let output = run(input);

    assert!(output.contains("super(name, age)"));
    assert!(!output.contains("Animal.call"));
}

#[test]
fn delegation_with_only_this_becomes_bare_super() {
    let input = "\
function Dog() { Animal.call(this); this.tag = 1; }
util.inherits(Dog, Animal);
";
    let output = run(input);

    assert!(output.contains("super()"));
    assert!(output.contains("this.tag = 1"));
    assert!(!output.contains("Animal.call"));
}

#[test]
fn delegation_nested_in_a_conditional_is_not_rewritten() {
    let input = "\
function Dog(name) {
  if (name) {
    Animal.call(this, name);
  }
}
util.inherits(Dog, Animal);
";
    let output = run(input);

    assert!(output.contains("class Dog extends Animal"));
    assert!(output.contains("Animal.call(this, name)"));
    assert!(!output.contains("super("));
}

#[test]
fn delegation_whose_first_argument_is_not_this_is_not_rewritten() {
    let input = "\
function Dog(other) { Animal.call(other, 'name'); }
util.inherits(Dog, Animal);
";
    let output = run(input);

    assert!(output.contains("Animal.call(other"));
    assert!(!output.contains("super("));
}

#[test]
fn call_on_a_different_expression_is_not_rewritten() {
    let input = "\
function Dog(name) { Creature.call(this, name); }
util.inherits(Dog, Animal);
";
    let output = run(input);

    assert!(output.contains("class Dog extends Animal"));
    assert!(output.contains("Creature.call(this, name)"));
    assert!(!output.contains("super("));
}

#[test]
fn matching_is_structural_across_distinct_nodes() {
    // The `ns.Base` inside the constructor and the one recorded from the
    // prototype wiring are different node objects with different positions.
    let input = "\
function Derived(x) { ns.Base.call(this, x); }
Derived.prototype = Object.create(ns.Base.prototype);
Derived.prototype.constructor = Derived;
";
    let output = run(input);

    assert!(output.contains("class Derived extends ns.Base"));
    assert!(output.contains("super(x)"));
    assert!(!output.contains("ns.Base.call"));
}

#[test]
fn every_top_level_delegation_is_rewritten() {
    let input = "\
function Dog(name) {
  Animal.call(this, name);
  this.renamed = true;
  Animal.call(this, 'again');
}
util.inherits(Dog, Animal);
";
    let output = run(input);

    assert!(output.contains("super(name)"));
    assert!(output.contains("super(\"again\")") || output.contains("super('again')"));
    assert!(!output.contains("Animal.call"));
}

#[test]
fn surrounding_constructor_statements_keep_their_positions() {
    let input = "\
function Dog(name) {
  const tag = 'collar';
  Animal.call(this, name);
  this.tag = tag;
}
util.inherits(Dog, Animal);
";
    let output = run(input);

    let decl = output.find("const tag").unwrap();
    let sup = output.find("super(name)").unwrap();
    let assign = output.find("this.tag = tag").unwrap();
    assert!(decl < sup && sup < assign);
}

#[test]
fn delegation_without_a_recorded_superclass_is_left_alone() {
    // Methods make the function convertible, but with no superclass there is
    // nothing to rewrite the delegation against.
    let input = "\
function Dog(name) { Animal.call(this, name); }
Dog.prototype.bark = function () {};
";
    let output = run(input);

    assert!(output.contains("class Dog"));
    assert!(!output.contains("extends"));
    assert!(output.contains("Animal.call(this, name)"));
}
